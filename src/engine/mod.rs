//! Deterministic branch-evaluation engine
//!
//! Everything here is pure and synchronous:
//! - No I/O, no global state, no randomness
//! - The driver table is read-only; per-branch repeat counters are the
//!   only mutable state, and they are never shared between branches
//! - Segments are emitted depth-first into a caller-supplied sink

pub mod evaluate;
pub mod integrate;
pub mod ribbon;
pub mod style;

pub use evaluate::{
    DivergentLoopError, EvalConfig, RepeatOverlay, Segment, SegmentSink, collect_segments,
    evaluate,
};
pub use integrate::integrate;
pub use ribbon::edge_points;
pub use style::resolve_color;
