//! Orientation sampling and signal conditioning for bubble-level displays.
//!
//! Samples flow from an [OrientationSampler](sampler::OrientationSampler),
//! which reads either a [MotionProvider](motion::MotionProvider) or a
//! synthetic generator, into an [OrientationState](state::OrientationState)
//! that applies calibration and smoothing. The
//! [OrientationService](service::OrientationService) owns both and is the
//! only writer of the published [DisplayState].
pub mod bubble;
pub mod client;
pub mod filter;
pub mod motion;
pub mod sampler;
pub mod service;
pub mod state;
pub mod synthetic;
pub mod ticker;

#[cfg(test)]
mod filter_test;
#[cfg(test)]
mod service_test;

use std::{fmt, time::Instant};

use nalgebra::UnitQuaternion;
use serde::Serialize;

/// Orientation quaternion (x, y, z, w)
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Build the quaternion for the given roll, pitch and yaw in radians
    pub fn from_euler(roll: f64, pitch: f64, yaw: f64) -> Self {
        let q = UnitQuaternion::from_euler_angles(roll, pitch, yaw);
        Self::new(q.i, q.j, q.k, q.w)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Orientation of the device as reported by a motion sensor. Angles are in
/// radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Attitude {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub quaternion: Quaternion,
}

impl Attitude {
    pub fn new(roll: f64, pitch: f64, yaw: f64, quaternion: Quaternion) -> Self {
        Self {
            roll,
            pitch,
            yaw,
            quaternion,
        }
    }

    /// Create an attitude from Euler angles (radians), deriving the quaternion
    pub fn from_euler(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self::new(roll, pitch, yaw, Quaternion::from_euler(roll, pitch, yaw))
    }
}

/// Where an [OrientationSample] came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleSource {
    /// Device motion sensor
    Hardware,
    /// Generated demo signal
    Synthetic,
}

impl fmt::Display for SampleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleSource::Hardware => write!(f, "hardware"),
            SampleSource::Synthetic => write!(f, "synthetic"),
        }
    }
}

/// A single orientation reading. Angles are always in radians regardless of
/// the source.
#[derive(Clone, Copy, Debug)]
pub struct OrientationSample {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub quaternion: Quaternion,
    pub timestamp: Instant,
    pub source: SampleSource,
}

impl OrientationSample {
    pub fn new(attitude: Attitude, source: SampleSource) -> Self {
        Self {
            roll: attitude.roll,
            pitch: attitude.pitch,
            yaw: attitude.yaw,
            quaternion: attitude.quaternion,
            timestamp: Instant::now(),
            source,
        }
    }
}

/// Zero reference subtracted from readings, in degrees. Accumulates every
/// time the user calibrates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct CalibrationOffset {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

/// The state observed by a display. Every field of one tick is published
/// together.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DisplayState {
    pub roll_deg: f64,
    pub pitch_deg: f64,
    pub yaw_deg: f64,
    pub qx: f64,
    pub qy: f64,
    pub qz: f64,
    pub qw: f64,
    pub sample_hz: f64,
    pub error_message: Option<String>,
}

impl DisplayState {
    /// Returns the displayed orientation quaternion
    pub fn quaternion(&self) -> Quaternion {
        Quaternion::new(self.qx, self.qy, self.qz, self.qw)
    }

    fn set_quaternion(&mut self, q: Quaternion) {
        self.qx = q.x;
        self.qy = q.y;
        self.qz = q.z;
        self.qw = q.w;
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            roll_deg: 0.0,
            pitch_deg: 0.0,
            yaw_deg: 0.0,
            qx: 0.0,
            qy: 0.0,
            qz: 0.0,
            qw: 1.0,
            sample_hz: 0.0,
            error_message: None,
        }
    }
}
