use nalgebra::Vector2;

use crate::constants::DEFAULT_FULL_SCALE_DEG;

/// Offset of the bubble from the center of a dial with the given radius,
/// using the default full-scale tilt.
pub fn bubble_offset(roll_deg: f64, pitch_deg: f64, radius: f64) -> (f64, f64) {
    bubble_offset_scaled(roll_deg, pitch_deg, radius, DEFAULT_FULL_SCALE_DEG)
}

/// Offset of the bubble from the center of a dial. A tilt of
/// `full_scale_deg` moves the bubble one radius; larger tilts are clamped to
/// the rim without changing direction. Screen y grows downward, so pitching
/// forward moves the bubble up.
pub fn bubble_offset_scaled(
    roll_deg: f64,
    pitch_deg: f64,
    radius: f64,
    full_scale_deg: f64,
) -> (f64, f64) {
    let valid = radius > 0.0 && full_scale_deg > 0.0;
    if !valid {
        return (0.0, 0.0);
    }

    let scale = radius / full_scale_deg;
    let offset = Vector2::new(roll_deg * scale, -pitch_deg * scale);
    let magnitude = offset.norm();
    if magnitude > radius {
        let clamped = offset * (radius / magnitude);
        return (clamped.x, clamped.y);
    }

    (offset.x, offset.y)
}
