/// One-pole low-pass filter (exponential smoothing).
///
///   filtered = previous + alpha * (raw - previous)
///
/// The filter keeps no history of its own; the previous value is whatever
/// was last displayed, so the filter picks up from the current reading when
/// the source changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LowPassFilter {
    alpha: f64,
}

impl LowPassFilter {
    /// Create a new filter. Alpha is clamped to 0.0..=1.0, where 1.0 passes
    /// raw values through unchanged.
    pub fn new(alpha: f64) -> Self {
        let alpha = if alpha.is_nan() {
            log::warn!("Invalid filter alpha {alpha}, disabling smoothing");
            1.0
        } else {
            alpha.clamp(0.0, 1.0)
        };
        Self { alpha }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Apply one filter step
    pub fn step(&self, previous: f64, raw: f64) -> f64 {
        previous + self.alpha * (raw - previous)
    }
}
