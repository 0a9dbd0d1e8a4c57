//! Segment color resolution

use crate::driver::DriverStep;

/// Resolve the emitted color: each channel scaled by the step's
/// luminosity, rounded, clamped to a byte.
pub fn resolve_color(step: &DriverStep) -> [u8; 3] {
    [
        channel(step.color_r, step.luminosity),
        channel(step.color_g, step.luminosity),
        channel(step.color_b, step.luminosity),
    ]
}

#[inline]
fn channel(value: f32, luminosity: f32) -> u8 {
    (value * luminosity).round().clamp(0.0, 255.0) as u8
}
