use crate::orientation::Attitude;

/// Accelerometer reading in meters per second squared, already rotated by
/// the mount matrix
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxisData {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AxisData {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Derive the device tilt from the direction of gravity. Yaw cannot be
    /// observed from an accelerometer and is always zero.
    ///   roll  = atan2(y, z)
    ///   pitch = atan2(-x, sqrt(y^2 + z^2))
    pub fn to_attitude(&self) -> Attitude {
        let roll = self.y.atan2(self.z);
        let pitch = (-self.x).atan2((self.y * self.y + self.z * self.z).sqrt());
        Attitude::from_euler(roll, pitch, 0.0)
    }
}
