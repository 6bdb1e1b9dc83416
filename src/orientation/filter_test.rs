use std::error::Error;

use crate::orientation::filter::LowPassFilter;

const ALPHA: f64 = 0.05;

/// Closed form of holding a constant input `raw` for `steps` filter steps
fn settled(raw: f64, initial: f64, steps: i32) -> f64 {
    raw - (raw - initial) * (1.0 - ALPHA).powi(steps)
}

#[tokio::test]
async fn test_convergence_matches_closed_form() -> Result<(), Box<dyn Error>> {
    let filter = LowPassFilter::new(ALPHA);
    let cases = [(8.0, 0.0), (-6.0, 3.5), (0.0, 12.0), (2.5, 2.5)];
    for (raw, initial) in cases {
        let mut value = initial;
        for step in 1..=120 {
            value = filter.step(value, raw);
            let expected = settled(raw, initial, step);
            assert!(
                (value - expected).abs() < 1e-9,
                "step {step} for raw={raw} initial={initial}: got {value}, expected {expected}"
            );
        }
    }

    Ok(())
}

#[tokio::test]
async fn test_single_step() -> Result<(), Box<dyn Error>> {
    let filter = LowPassFilter::new(ALPHA);
    assert!((filter.step(0.0, 10.0) - 0.5).abs() < 1e-12);
    assert_eq!(filter.step(4.0, 4.0), 4.0, "should not move at steady state");

    Ok(())
}

#[tokio::test]
async fn test_alpha_is_clamped() -> Result<(), Box<dyn Error>> {
    assert_eq!(LowPassFilter::new(1.5).alpha(), 1.0);
    assert_eq!(LowPassFilter::new(-0.2).alpha(), 0.0);
    assert_eq!(LowPassFilter::new(f64::NAN).alpha(), 1.0);

    let passthrough = LowPassFilter::new(1.0);
    assert_eq!(passthrough.step(3.0, -7.0), -7.0);

    Ok(())
}
