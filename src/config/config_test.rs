use std::error::Error;

use crate::config::{Config, MountMatrix};

#[tokio::test]
async fn test_empty_config_uses_defaults() -> Result<(), Box<dyn Error>> {
    let config = Config::from_yaml("{}")?;
    assert_eq!(config, Config::default());
    assert_eq!(config.sample_rate_hz, 60.0);
    assert!(!config.synthetic);
    assert_eq!(config.bubble.radius, 100.0);
    assert_eq!(config.bubble.full_scale_deg, 15.0);
    assert!(config.iio.is_none());

    Ok(())
}

#[tokio::test]
async fn test_load_full_config() -> Result<(), Box<dyn Error>> {
    let yaml = r#"
sample_rate_hz: 30
synthetic: true
bubble:
  radius: 64
iio:
  device: accel_3d
  mount_matrix:
    x: [0, 1, 0]
    y: [-1, 0, 0]
    z: [0, 0, 1]
"#;
    let config = Config::from_yaml(yaml)?;
    assert_eq!(config.sample_rate_hz, 30.0);
    assert!(config.synthetic);
    assert_eq!(config.bubble.radius, 64.0);
    assert_eq!(
        config.bubble.full_scale_deg, 15.0,
        "unset fields in a section should keep their defaults"
    );

    let iio = config.iio.expect("iio section should be loaded");
    assert_eq!(iio.device.as_deref(), Some("accel_3d"));
    assert_eq!(
        iio.mount_matrix,
        Some(MountMatrix {
            x: [0.0, 1.0, 0.0],
            y: [-1.0, 0.0, 0.0],
            z: [0.0, 0.0, 1.0],
        })
    );

    Ok(())
}

#[tokio::test]
async fn test_invalid_config() -> Result<(), Box<dyn Error>> {
    assert!(Config::from_yaml("sample_rate_hz: fast").is_err());
    assert!(Config::from_yaml("iio:\n  mount_matrix:\n    x: [1, 0]\n").is_err());
    assert!(Config::from_yaml_path("/nonexistent/bubblelevel.yaml").is_err());

    Ok(())
}
