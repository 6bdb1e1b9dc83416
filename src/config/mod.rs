pub mod path;

#[cfg(test)]
mod config_test;

use std::{io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_BUBBLE_RADIUS, DEFAULT_FULL_SCALE_DEG, DEFAULT_SAMPLE_RATE_HZ};

/// Represents all possible errors loading a [Config]
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read: {0}")]
    IoError(#[from] io::Error),
    #[error("Unable to deserialize: {0}")]
    DeserializeError(#[from] serde_yaml::Error),
}

/// Top-level configuration. Every field is optional in the YAML file and
/// falls back to its default.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case", default)]
pub struct Config {
    /// Rate in Hz to sample orientation at
    pub sample_rate_hz: f64,
    /// Always use simulated data instead of the motion sensor
    pub synthetic: bool,
    pub bubble: BubbleConfig,
    pub iio: Option<Iio>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            synthetic: false,
            bubble: BubbleConfig::default(),
            iio: None,
        }
    }
}

impl Config {
    /// Load a [Config] from the given YAML string
    pub fn from_yaml(content: &str) -> Result<Config, LoadError> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Load a [Config] from the given YAML file
    pub fn from_yaml_path<P: AsRef<Path>>(path: P) -> Result<Config, LoadError> {
        let file = std::fs::File::open(path)?;
        let config: Config = serde_yaml::from_reader(file)?;
        Ok(config)
    }

    /// Load the configuration from the first config file found in the
    /// standard locations, or the defaults if there is none.
    pub fn load() -> Result<Config, LoadError> {
        let Some(path) = path::find_config_file() else {
            log::debug!("No config file found, using defaults");
            return Ok(Config::default());
        };
        log::info!("Loading config from {path:?}");
        Self::from_yaml_path(path)
    }
}

/// Geometry of the bubble-level dial
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case", default)]
pub struct BubbleConfig {
    pub radius: f64,
    /// Tilt in degrees that moves the bubble to the rim
    pub full_scale_deg: f64,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_BUBBLE_RADIUS,
            full_scale_deg: DEFAULT_FULL_SCALE_DEG,
        }
    }
}

/// Options for the IIO accelerometer backend
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub struct Iio {
    /// IIO device name or id to use (e.g. "accel_3d" or "iio:device0")
    pub device: Option<String>,
    /// Override for the mount matrix reported by the kernel
    pub mount_matrix: Option<MountMatrix>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct MountMatrix {
    pub x: [f64; 3],
    pub y: [f64; 3],
    pub z: [f64; 3],
}
