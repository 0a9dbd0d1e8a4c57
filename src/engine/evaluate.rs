//! Branch evaluation: the walk/fork state machine
//!
//! A branch walks the driver table step by step, emitting one ribbon
//! segment per step, looping back while a step's repeat counter is
//! nonzero, and forking into fanned-out children at branch steps.
//! Branches are processed depth-first through an explicit work stack, so
//! evaluation depth is bounded by memory rather than the call stack.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{
    DEFAULT_INITIAL_HEADING, DEFAULT_INITIAL_RADIUS, DEFAULT_MAX_STEPS,
    DEFAULT_STEP_BUDGET_FACTOR,
};
use crate::driver::{DriverTable, Side};
use crate::engine::integrate::integrate;
use crate::engine::ribbon::edge_points;
use crate::engine::style::resolve_color;

/// A branch exceeded its step budget without terminating.
///
/// A repeat counter that never reaches zero (e.g. a negative count in the
/// table) would walk forever; the budget turns that into a hard failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("branch at step {step} exceeded its step budget of {budget}")]
pub struct DivergentLoopError {
    /// Step index the branch was at when the budget ran out.
    pub step: usize,
    /// The budget that was exceeded.
    pub budget: u32,
}

/// Evaluation parameters.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Steps to walk before a branch is considered complete.
    pub max_steps: usize,
    /// Heading of the root branch (radians).
    pub initial_heading: f32,
    /// Radius scale of the root branch.
    pub initial_radius: f32,
    /// Driver column the root branch reads heading increments from.
    pub initial_side: Side,
    /// Per-branch step budget; exceeding it raises [`DivergentLoopError`].
    pub step_budget: u32,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            initial_heading: DEFAULT_INITIAL_HEADING,
            initial_radius: DEFAULT_INITIAL_RADIUS,
            initial_side: Side::Left,
            step_budget: DEFAULT_STEP_BUDGET_FACTOR * DEFAULT_MAX_STEPS as u32,
        }
    }
}

/// Remaining repeat counts for one branch lineage.
///
/// The driver table itself never changes; each branch layers its own copy
/// of the repeat counters on top. Only nonzero counters are stored, so
/// cloning at a fork copies a handful of entries, not the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepeatOverlay {
    counts: HashMap<usize, i32>,
}

impl RepeatOverlay {
    /// Snapshot the repeat counters of every step in the table.
    pub fn from_table(table: &DriverTable) -> Self {
        let counts = table
            .steps()
            .iter()
            .filter(|step| step.repeat_count != 0)
            .map(|step| (step.index, step.repeat_count))
            .collect();
        Self { counts }
    }

    /// Remaining repeats for a step.
    pub fn remaining(&self, step: usize) -> i32 {
        self.counts.get(&step).copied().unwrap_or(0)
    }

    /// Consume one repeat of a step. Returns false when none remain.
    pub fn consume(&mut self, step: usize) -> bool {
        match self.counts.get_mut(&step) {
            Some(count) => {
                *count -= 1;
                if *count == 0 {
                    self.counts.remove(&step);
                }
                true
            }
            None => false,
        }
    }
}

/// One emitted ribbon segment, in model space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub begin_left: Vec2,
    pub begin_right: Vec2,
    pub end_left: Vec2,
    pub end_right: Vec2,
    /// Resolved fill color.
    pub color: [u8; 3],
    /// Step index the segment's style was taken from.
    pub step: usize,
}

impl Segment {
    /// Centerline end point (midpoint of the end edges).
    pub fn end_point(&self) -> Vec2 {
        (self.end_left + self.end_right) / 2.0
    }
}

/// Consumes segments as they are emitted.
pub trait SegmentSink {
    fn accept(&mut self, segment: Segment);
}

impl SegmentSink for Vec<Segment> {
    fn accept(&mut self, segment: Segment) {
        self.push(segment);
    }
}

/// Mutable state of one branch walk.
#[derive(Debug, Clone)]
struct Frame {
    point: Vec2,
    left_edge: Vec2,
    right_edge: Vec2,
    heading: f32,
    radius: f32,
    step: usize,
    side: Side,
    overlay: RepeatOverlay,
}

/// Walk the driver table and emit every ribbon segment of the fractal.
///
/// Branches are evaluated depth-first: a branch's full walk is emitted
/// before its next sibling starts. Each child receives its own copy of
/// the repeat counters, taken at the fork before any sibling runs, so
/// loop-backs consumed in one lineage never leak into another.
pub fn evaluate<S: SegmentSink>(
    table: &DriverTable,
    config: &EvalConfig,
    sink: &mut S,
) -> Result<(), DivergentLoopError> {
    let root = Frame {
        point: Vec2::ZERO,
        left_edge: Vec2::ZERO,
        right_edge: Vec2::ZERO,
        heading: config.initial_heading,
        radius: config.initial_radius,
        step: 0,
        side: config.initial_side,
        overlay: RepeatOverlay::from_table(table),
    };

    let mut stack = vec![root];
    while let Some(frame) = stack.pop() {
        walk(table, config, frame, sink, &mut stack)?;
    }
    Ok(())
}

/// Convenience wrapper collecting every segment into a vector.
pub fn collect_segments(
    table: &DriverTable,
    config: &EvalConfig,
) -> Result<Vec<Segment>, DivergentLoopError> {
    let mut segments = Vec::new();
    evaluate(table, config, &mut segments)?;
    Ok(segments)
}

/// Walk one branch until it forks, runs out of steps, or runs out of
/// table. Children spawned at a fork are pushed onto `stack`.
fn walk<S: SegmentSink>(
    table: &DriverTable,
    config: &EvalConfig,
    frame: Frame,
    sink: &mut S,
    stack: &mut Vec<Frame>,
) -> Result<(), DivergentLoopError> {
    let Frame {
        mut point,
        mut left_edge,
        mut right_edge,
        mut heading,
        radius,
        mut step,
        side,
        mut overlay,
    } = frame;

    let mut steps_taken: u32 = 0;

    while step < config.max_steps {
        steps_taken += 1;
        if steps_taken > config.step_budget {
            return Err(DivergentLoopError {
                step,
                budget: config.step_budget,
            });
        }

        // Running off the table ends the branch.
        let Some(row) = table.get(step) else {
            return Ok(());
        };

        let d_r = row.d_r * radius;
        let d_phi = row.d_phi(side);

        if row.branch_count != 0 {
            // The branch step emits nothing itself; its scaled dR seeds
            // the children's radius.
            if step + 1 < config.max_steps {
                let count = row.branch_count;
                let mut children = Vec::new();
                for bn in 1..=count {
                    // Centers the fan symmetrically around the incoming heading.
                    let fan = bn as f32 - count as f32 / 2.0 - 0.5;
                    let child_heading = heading + fan * row.branch_angle;
                    for direction in [Side::Left, Side::Right] {
                        if row.branch_sides.contains(direction) {
                            children.push(Frame {
                                point,
                                left_edge,
                                right_edge,
                                heading: child_heading,
                                radius: d_r,
                                step: step + 1,
                                // A left-direction child reads the right
                                // column and vice versa; the crossed
                                // columns make siblings diverge.
                                side: direction.opposite(),
                                overlay: overlay.clone(),
                            });
                        }
                    }
                }
                // Reverse so the first child is walked first.
                while let Some(child) = children.pop() {
                    stack.push(child);
                }
            }
            return Ok(());
        }

        // Loop-back: consume pending repeats at this step before
        // advancing. The position increment keeps the values read above;
        // only the style lookup below sees the jumped-to step.
        while overlay.consume(step) {
            steps_taken += 1;
            if steps_taken > config.step_budget {
                return Err(DivergentLoopError {
                    step,
                    budget: config.step_budget,
                });
            }
            let Some(repeat_row) = table.get(step) else {
                return Ok(());
            };
            step = repeat_row.repeat_from;
        }

        let (next, new_heading) = integrate(point, heading, d_r, d_phi);
        heading = new_heading;

        let Some(style_row) = table.get(step) else {
            return Ok(());
        };
        let (end_left, end_right) = edge_points(point, next, style_row.width);
        sink.accept(Segment {
            begin_left: left_edge,
            begin_right: right_edge,
            end_left,
            end_right,
            color: resolve_color(style_row),
            step,
        });

        point = next;
        left_edge = end_left;
        right_edge = end_right;
        step += 1;
    }
    Ok(())
}
