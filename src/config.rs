//! Run configuration
//!
//! [`Config`] gathers the knobs shared by the validator, the interpreter and the
//! viewer. Setters clamp out-of-range values instead of failing.

use crate::interpreter::constants::{
    DEFAULT_CANVAS_SIZE, DEFAULT_HISTORY_LIMIT, DEFAULT_MAX_STEPS, MAX_CANVAS_SIZE,
    MIN_CANVAS_SIZE,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    canvas_size: usize,
    max_steps: usize,
    /// Snapshot memory budget in bytes; `None` disables history recording
    history_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            canvas_size: DEFAULT_CANVAS_SIZE,
            max_steps: DEFAULT_MAX_STEPS,
            history_limit: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas_size(mut self, size: usize) -> Self {
        self.set_canvas_size(size);
        self
    }

    pub fn with_max_steps(mut self, steps: usize) -> Self {
        self.max_steps = steps.max(1);
        self
    }

    /// Enable history recording with a budget in bytes
    pub fn with_history(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    /// Enable history recording with the default budget
    pub fn with_default_history(self) -> Self {
        self.with_history(DEFAULT_HISTORY_LIMIT)
    }

    pub fn set_canvas_size(&mut self, size: usize) {
        self.canvas_size = size.clamp(MIN_CANVAS_SIZE, MAX_CANVAS_SIZE);
    }

    pub fn canvas_size(&self) -> usize {
        self.canvas_size
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn history_limit(&self) -> Option<usize> {
        self.history_limit
    }
}
