//! Generation options.

use crate::constants::{DEFAULT_ATTEMPT_MULTIPLIER, DEFAULT_BATCH_SIZE};

/// Options for a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Attempts per batch between merges and progress reports.
    pub batch_size: usize,
    /// Whole-run attempt budget is `target * attempt_multiplier`.
    pub attempt_multiplier: u64,
    /// Seed for a reproducible run; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            attempt_multiplier: DEFAULT_ATTEMPT_MULTIPLIER,
            seed: None,
        }
    }
}

impl GenerationOptions {
    /// Normalize options, applying defaults where values are zero.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.batch_size == 0 {
            self.batch_size = DEFAULT_BATCH_SIZE;
        }
        if self.attempt_multiplier == 0 {
            self.attempt_multiplier = DEFAULT_ATTEMPT_MULTIPLIER;
        }
        self
    }

    /// Attempt budget for a run of `target` numbers.
    #[must_use]
    pub fn max_attempts(&self, target: usize) -> u64 {
        (target as u64).saturating_mul(self.attempt_multiplier)
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
