//! Generator trait, run results, and the `BatchGenerator` engine.
//!
//! `Generator` is the public trait consumed by orchestration.
//! `BatchGenerator` produces unique valid numbers in fixed-size batches,
//! reporting progress after each merge and honoring a cancellation token
//! between candidates.

use std::collections::HashSet;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::constants::{PHONE_NUMBER_LEN, SUFFIX_LEN};
use crate::number::PhoneNumber;
use crate::observer::ProgressObserver;
use crate::options::GenerationOptions;
use crate::progress::{CancellationToken, GenerationProgress};

/// Error type for generation runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenError {
    /// The request cannot be served (bad target, unknown group, no prefixes).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A run is already active on this session.
    #[error("a generation run is already active")]
    AlreadyRunning,

    /// The result container could not be grown.
    #[error("resource exhaustion: {0}")]
    ResourceExhaustion(String),

    /// The background run failed unexpectedly.
    #[error("generation failed: {0}")]
    Internal(String),

    /// The background run did not acknowledge cancellation in time.
    #[error("background run did not stop within {0:?}")]
    CancelTimeout(Duration),
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The requested number of unique numbers was produced.
    TargetReached,
    /// The attempt budget ran out before the target was reached.
    BudgetExhausted,
    /// The cancellation token was observed.
    Cancelled,
}

/// Terminal result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// Deduplicated numbers; order is irrelevant.
    pub numbers: HashSet<PhoneNumber>,
    /// Candidates produced, valid or not.
    pub attempts: u64,
    /// Requested number of unique numbers.
    pub target: usize,
    /// Why the run stopped.
    pub stop: StopReason,
}

impl GenerationResult {
    #[must_use]
    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// Whether the attempt budget ran out before the target was reached.
    #[must_use]
    pub fn budget_exhausted(&self) -> bool {
        self.stop == StopReason::BudgetExhausted
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.stop == StopReason::Cancelled
    }

    /// Numbers in ascending order.
    #[must_use]
    pub fn into_sorted(self) -> Vec<PhoneNumber> {
        let mut numbers: Vec<PhoneNumber> = self.numbers.into_iter().collect();
        numbers.sort_unstable();
        numbers
    }
}

/// Public trait for number generators, consumed by orchestration.
pub trait Generator: Send + Sync {
    /// Generate up to `target` unique numbers drawn from `prefixes`.
    fn generate(
        &self,
        prefixes: &[String],
        target: usize,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
    ) -> Result<GenerationResult, GenError>;

    /// Get the name of this generator.
    fn name(&self) -> &str;
}

/// Batch generator with a whole-run attempt budget.
#[derive(Debug, Clone, Default)]
pub struct BatchGenerator {
    opts: GenerationOptions,
}

impl BatchGenerator {
    #[must_use]
    pub fn new(opts: GenerationOptions) -> Self {
        Self {
            opts: opts.normalize(),
        }
    }

    #[must_use]
    pub fn options(&self) -> &GenerationOptions {
        &self.opts
    }

    fn rng(&self) -> StdRng {
        match self.opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Uniform prefix followed by 8 uniform digits. `prefixes` must be non-empty.
    fn candidate<R: Rng>(rng: &mut R, prefixes: &[String]) -> String {
        let prefix = &prefixes[rng.gen_range(0..prefixes.len())];
        let mut candidate = String::with_capacity(PHONE_NUMBER_LEN);
        candidate.push_str(prefix);
        for _ in 0..SUFFIX_LEN {
            candidate.push(char::from(b'0' + rng.gen_range(0..10u8)));
        }
        candidate
    }
}

impl Generator for BatchGenerator {
    fn generate(
        &self,
        prefixes: &[String],
        target: usize,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
    ) -> Result<GenerationResult, GenError> {
        if target == 0 {
            return Err(GenError::InvalidRequest(
                "target count must be at least 1".into(),
            ));
        }
        if prefixes.is_empty() {
            return Err(GenError::InvalidRequest("no prefixes to draw from".into()));
        }

        let max_attempts = self.opts.max_attempts(target);
        let mut rng = self.rng();
        let mut numbers: HashSet<PhoneNumber> = HashSet::new();
        let mut attempts = 0u64;

        debug!(target, prefixes = prefixes.len(), max_attempts, "Generation started");

        while numbers.len() < target && attempts < max_attempts && !cancel.is_cancelled() {
            let batch_size = self.opts.batch_size.min(target - numbers.len());
            let mut batch = HashSet::new();
            batch
                .try_reserve(batch_size)
                .map_err(|e| GenError::ResourceExhaustion(e.to_string()))?;

            for _ in 0..batch_size {
                if cancel.is_cancelled() {
                    break;
                }
                let candidate = Self::candidate(&mut rng, prefixes);
                attempts += 1;
                if let Ok(number) = PhoneNumber::parse(candidate) {
                    batch.insert(number);
                }
                if attempts >= max_attempts {
                    break;
                }
            }

            numbers
                .try_reserve(batch.len())
                .map_err(|e| GenError::ResourceExhaustion(e.to_string()))?;
            numbers.extend(batch);

            trace!(generated = numbers.len(), attempts, "Batch merged");
            observer.on_progress(&GenerationProgress::new(numbers.len(), target, attempts));
        }

        // The loop only exits early on cancellation when neither bound was hit.
        let stop = if numbers.len() >= target {
            StopReason::TargetReached
        } else if attempts >= max_attempts {
            StopReason::BudgetExhausted
        } else {
            StopReason::Cancelled
        };

        debug!(generated = numbers.len(), attempts, ?stop, "Generation finished");

        Ok(GenerationResult {
            numbers,
            attempts,
            target,
            stop,
        })
    }

    fn name(&self) -> &str {
        "BatchGenerator"
    }
}
