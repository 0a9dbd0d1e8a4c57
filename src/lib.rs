//! Ribbon Fractal - branching 2D ribbon fractals grown from tabular data
//!
//! Core modules:
//! - `driver`: the immutable driver table and its loader
//! - `engine`: deterministic branch evaluation (integration, ribbon
//!   geometry, style, fork and loop-back control)
//! - `render`: SVG output
//! - `settings`: run configuration
//!
//! The engine walks the driver table one step at a time, integrating
//! heading and position, and forks into fanned-out children at branch
//! steps. Each branch owns its own copy of the table's repeat counters,
//! so loop-backs consumed by one branch never affect a sibling.

pub mod driver;
pub mod engine;
pub mod render;
pub mod settings;

pub use driver::{DriverStep, DriverTable, Side};
pub use engine::{EvalConfig, Segment, collect_segments, evaluate};
pub use settings::Settings;

use glam::Vec2;

/// Generation defaults
pub mod consts {
    /// Steps walked per branch before it is considered complete.
    pub const DEFAULT_MAX_STEPS: usize = 99;
    /// Root branch heading (radians).
    pub const DEFAULT_INITIAL_HEADING: f32 = 3.141;
    /// Root branch radius scale.
    pub const DEFAULT_INITIAL_RADIUS: f32 = 1.0;
    /// Multiplier for the per-branch step budget (`factor * max_steps`).
    pub const DEFAULT_STEP_BUDGET_FACTOR: u32 = 10;
}

/// Unit vector for a heading angle (x = sin φ, y = cos φ)
#[inline]
pub fn heading_vector(phi: f32) -> Vec2 {
    Vec2::new(phi.sin(), phi.cos())
}
