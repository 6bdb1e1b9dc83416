use std::{error::Error, time::Duration};

use crate::cli::run::refresh_period;

#[tokio::test]
async fn test_refresh_period() -> Result<(), Box<dyn Error>> {
    assert_eq!(refresh_period(10.0), Duration::from_millis(100));
    assert_eq!(refresh_period(0.0), Duration::from_secs(10));
    assert_eq!(refresh_period(-3.0), Duration::from_secs(10));
    assert_eq!(refresh_period(f64::NAN), Duration::from_secs(10));
    assert_eq!(refresh_period(f64::INFINITY), Duration::from_millis(1));
    assert_eq!(refresh_period(1e300), Duration::from_millis(1));

    Ok(())
}
