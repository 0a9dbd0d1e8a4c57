//! The position/heading integrator

use glam::Vec2;

use crate::heading_vector;

/// Advance one step: accumulate the heading increment, then move `d_r`
/// along the new heading.
///
/// The heading is a plain running sum in radians and is never wrapped.
#[inline]
pub fn integrate(point: Vec2, phi: f32, d_r: f32, d_phi: f32) -> (Vec2, f32) {
    let new_phi = phi + d_phi;
    (point + d_r * heading_vector(new_phi), new_phi)
}
