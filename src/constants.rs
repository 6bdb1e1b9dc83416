/// Default rate in Hz that orientation samples are produced at
pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 60.0;
/// Smoothing factor for the one-pole low-pass filter applied to simulated data
pub const DEFAULT_FILTER_ALPHA: f64 = 0.05;
/// Default radius of the bubble-level dial, in display units
pub const DEFAULT_BUBBLE_RADIUS: f64 = 100.0;
/// Tilt in degrees that moves the bubble a full radius from center
pub const DEFAULT_FULL_SCALE_DEG: f64 = 15.0;
/// Name used for configuration directories (e.g. ~/.config/bubblelevel)
pub const CONFIG_PREFIX: &str = "bubblelevel";
/// Glob of IIO device names that expose a usable accelerometer
pub const IIO_ACCEL_NAME_GLOB: &str = "{accel_3d,*accel*,bmi*,i2c-BMI*,i2c-BOSC*,mxc*,lis*}";
/// Message reported when hardware was requested but could not be used
pub const FALLBACK_MESSAGE: &str = "motion sensor unavailable, using simulated data";
