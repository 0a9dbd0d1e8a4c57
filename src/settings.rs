//! Run settings, loadable from a JSON file
//!
//! Covers the evaluation surface (steps, root heading/radius/column) and
//! the renderer's canvas transform. Missing or malformed files fall back
//! to defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_INITIAL_HEADING, DEFAULT_INITIAL_RADIUS, DEFAULT_MAX_STEPS,
    DEFAULT_STEP_BUDGET_FACTOR,
};
use crate::driver::Side;
use crate::engine::EvalConfig;
use crate::render::RenderConfig;

/// Settings for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Steps to walk before a branch is considered complete.
    pub max_steps: usize,
    /// Root branch heading (radians).
    pub initial_heading: f32,
    /// Root branch radius scale.
    pub initial_radius: f32,
    /// Driver column the root branch reads heading increments from.
    pub initial_side: Side,
    /// A branch may take at most `step_budget_factor * max_steps` steps.
    pub step_budget_factor: u32,
    /// Canvas transform for SVG output.
    pub render: RenderConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            initial_heading: DEFAULT_INITIAL_HEADING,
            initial_radius: DEFAULT_INITIAL_RADIUS,
            initial_side: Side::Left,
            step_budget_factor: DEFAULT_STEP_BUDGET_FACTOR,
            render: RenderConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults when the
    /// file is missing or malformed.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("Ignoring malformed settings file {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Evaluation parameters derived from these settings.
    pub fn eval_config(&self) -> EvalConfig {
        EvalConfig {
            max_steps: self.max_steps,
            initial_heading: self.initial_heading,
            initial_radius: self.initial_radius,
            initial_side: self.initial_side,
            step_budget: self.step_budget_factor.saturating_mul(self.max_steps as u32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.max_steps, 99);
        assert_eq!(settings.initial_side, Side::Left);
        assert!((settings.initial_heading - 3.141).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_fills_in_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"max_steps": 12}"#).unwrap();
        assert_eq!(settings.max_steps, 12);
        assert!((settings.initial_radius - 1.0).abs() < 1e-6);
        assert!((settings.render.scale - 19.0).abs() < 1e-6);
    }

    #[test]
    fn test_eval_config_budget() {
        let mut settings = Settings::default();
        settings.max_steps = 40;
        settings.step_budget_factor = 10;
        assert_eq!(settings.eval_config().step_budget, 400);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let settings = Settings::load("/nonexistent/settings.json");
        assert_eq!(settings.max_steps, Settings::default().max_steps);
    }
}
