use super::{
    filter::LowPassFilter, CalibrationOffset, DisplayState, OrientationSample, Quaternion,
    SampleSource,
};

/// Holds the calibration offset and the latest display state, and turns raw
/// samples into display values.
///
/// Hardware samples are assumed to be smoothed by the platform and only have
/// the offset removed. Synthetic samples additionally have roll and pitch
/// low-pass filtered.
// NOTE: The hardware/synthetic filtering asymmetry is kept on purpose until
// someone decides hardware readings should be smoothed too.
#[derive(Clone, Debug)]
pub struct OrientationState {
    offset: CalibrationOffset,
    display: DisplayState,
    filter: LowPassFilter,
    sample_hz: f64,
}

impl OrientationState {
    pub fn new(alpha: f64) -> Self {
        Self {
            offset: CalibrationOffset::default(),
            display: DisplayState::default(),
            filter: LowPassFilter::new(alpha),
            sample_hz: 0.0,
        }
    }

    /// The most recent display state
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// The accumulated calibration offset
    pub fn offset(&self) -> CalibrationOffset {
        self.offset
    }

    /// Set the rate reported with every subsequent sample
    pub fn set_sample_rate(&mut self, sample_hz: f64) {
        self.sample_hz = sample_hz;
    }

    pub fn set_error_message(&mut self, message: Option<String>) {
        self.display.error_message = message;
    }

    /// Apply a single sample to the display state
    pub fn on_sample(&mut self, sample: &OrientationSample) {
        let roll = sample.roll.to_degrees() - self.offset.roll;
        let pitch = sample.pitch.to_degrees() - self.offset.pitch;

        match sample.source {
            SampleSource::Hardware => {
                self.display.roll_deg = roll;
                self.display.pitch_deg = pitch;
                self.display.yaw_deg = sample.yaw.to_degrees() - self.offset.yaw;
                self.display.set_quaternion(sample.quaternion);
            }
            SampleSource::Synthetic => {
                self.display.roll_deg = self.filter.step(self.display.roll_deg, roll);
                self.display.pitch_deg = self.filter.step(self.display.pitch_deg, pitch);
                self.display.yaw_deg = 0.0;
                self.display.set_quaternion(Quaternion::IDENTITY);
            }
        }
        self.display.sample_hz = self.sample_hz;

        log::trace!(
            "Orientation roll={:.3} pitch={:.3} yaw={:.3}",
            self.display.roll_deg,
            self.display.pitch_deg,
            self.display.yaw_deg
        );
    }

    /// Make the current reading the new zero point. The displayed values
    /// already have the previous offset removed, so repeated calibrations
    /// accumulate.
    pub fn calibrate(&mut self) -> CalibrationOffset {
        self.offset.roll += self.display.roll_deg;
        self.offset.pitch += self.display.pitch_deg;
        self.offset.yaw += self.display.yaw_deg;
        log::info!(
            "Calibrated orientation offset: roll={:.3} pitch={:.3} yaw={:.3}",
            self.offset.roll,
            self.offset.pitch,
            self.offset.yaw
        );
        self.offset
    }
}
