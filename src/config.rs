//! Configuration loader for GridWorld.
//!
//! * Looks for `gridworld.toml` in the cwd unless overridden by `--config`.
//! * Provides defaults so the file is optional.
//!
//! Extend this struct whenever you add new tunables.

use serde::Deserialize;
use std::fs;
use std::time::Duration;

use log::warn;

use crate::color::Color;
use crate::grid::{GridShape, DEFAULT_COLS, DEFAULT_ROWS};
use crate::scenario::Scenario;

pub const DEFAULT_PATH: &str = "gridworld.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Grid size in cells (ignored when `unbounded`).
    pub rows:          i32,
    pub cols:          i32,
    /// Use a sparse grid with no edges.
    pub unbounded:     bool,
    /// Random seed (optional). Without one every run differs.
    pub seed:          Option<u64>,
    /// Pause between steps of a continuous run.
    pub step_delay_ms: u64,
    /// Steps to run before exiting.
    pub steps:         u64,
    /// Demo layout to start from.
    pub scenario:      Scenario,
    /// Color of flowers the layout leaves uncolored, by name or `#rrggbb`.
    pub flower_color:  Color,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            unbounded: false,
            seed: None,
            step_delay_ms: 500,
            steps: 10,
            scenario: Scenario::default(),
            flower_color: Color::PINK,
        }
    }
}

impl Config {
    /// Load from a TOML file; fall back to defaults on any error.
    pub fn load(path: Option<&str>) -> Self {
        let p = path.unwrap_or(DEFAULT_PATH);
        match fs::read_to_string(p) {
            Ok(text) => Self::parse(&text).unwrap_or_else(|e| {
                warn!("ignoring malformed {}: {}", p, e);
                Self::default()
            }),
            Err(e) => {
                // a missing default file is the normal case
                if path.is_some() {
                    warn!("cannot read {}: {}, using defaults", p, e);
                }
                Self::default()
            }
        }
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn grid_shape(&self) -> GridShape {
        if self.unbounded {
            GridShape::Unbounded
        } else {
            GridShape::Bounded {
                rows: self.rows,
                cols: self.cols,
            }
        }
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}
