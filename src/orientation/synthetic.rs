use super::{Attitude, OrientationSample, Quaternion, SampleSource};

/// Generates a gentle rocking motion for demos and for devices without a
/// motion sensor.
#[derive(Clone, Debug)]
pub struct SyntheticGenerator {
    t: f64,
    dt: f64,
}

impl SyntheticGenerator {
    pub fn new(rate_hz: f64) -> Self {
        Self {
            t: 0.0,
            dt: 1.0 / rate_hz,
        }
    }

    /// Virtual time in seconds of the last generated sample
    pub fn time(&self) -> f64 {
        self.t
    }

    /// Roll in degrees at virtual time `t`
    pub fn roll_deg_at(t: f64) -> f64 {
        (t * 1.2).sin() * 8.0
    }

    /// Pitch in degrees at virtual time `t`
    pub fn pitch_deg_at(t: f64) -> f64 {
        (t * 0.9).cos() * 6.0
    }

    /// Advance virtual time by one period and return the sample for it
    pub fn next_sample(&mut self) -> OrientationSample {
        self.t += self.dt;
        let attitude = Attitude::new(
            Self::roll_deg_at(self.t).to_radians(),
            Self::pitch_deg_at(self.t).to_radians(),
            0.0,
            Quaternion::IDENTITY,
        );
        OrientationSample::new(attitude, SampleSource::Synthetic)
    }
}
