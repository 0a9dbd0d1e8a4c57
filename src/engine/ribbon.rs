//! Ribbon edge geometry
//!
//! A segment is drawn as a quad. Begin edges are reused from the previous
//! step's end edges, so only the end edges are computed here; that keeps
//! the ribbon exactly continuous at shared vertices, including across a
//! fork.

use glam::Vec2;

/// Left/right edge points at `end` for a segment running `begin → end`.
///
/// The perpendicular is the (unnormalized) direction vector rotated a
/// quarter turn, `(x, y) → (-y, x)`; each edge sits half a width off the
/// centerline. A zero-length direction puts both edges on `end`, yielding
/// a degenerate polygon — kept as-is.
#[inline]
pub fn edge_points(begin: Vec2, end: Vec2, width: f32) -> (Vec2, Vec2) {
    let dir = end - begin;
    let normal = Vec2::new(-dir.y, dir.x);
    let left = end - normal * width / 2.0;
    let right = end + normal * width / 2.0;
    (left, right)
}
