//! Orchestration interfaces and event types.

use std::time::Duration;

use phonegen_core::generator::{GenError, GenerationResult};
use phonegen_core::number::PhoneNumber;
use phonegen_core::progress::GenerationProgress;

/// Terminal status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Target reached or attempt budget exhausted.
    Completed,
    /// Stopped by an explicit cancel; partial results kept.
    Cancelled,
    /// Stopped by an error; partial results discarded.
    Failed,
}

/// Terminal outcome of a run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(GenerationResult),
    Cancelled(GenerationResult),
    Failed(GenError),
}

impl RunOutcome {
    #[must_use]
    pub fn status(&self) -> RunStatus {
        match self {
            Self::Completed(_) => RunStatus::Completed,
            Self::Cancelled(_) => RunStatus::Cancelled,
            Self::Failed(_) => RunStatus::Failed,
        }
    }

    /// The (possibly partial) result, if the run did not fail.
    #[must_use]
    pub fn result(&self) -> Option<&GenerationResult> {
        match self {
            Self::Completed(r) | Self::Cancelled(r) => Some(r),
            Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn into_result(self) -> Result<GenerationResult, GenError> {
        match self {
            Self::Completed(r) | Self::Cancelled(r) => Ok(r),
            Self::Failed(e) => Err(e),
        }
    }
}

/// Event delivered from a background run to the session owner.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Snapshot emitted after a batch merge.
    Progress {
        run_id: u64,
        progress: GenerationProgress,
    },
    /// Last event of a run.
    Finished {
        run_id: u64,
        outcome: RunOutcome,
        elapsed: Duration,
    },
}

impl SessionEvent {
    #[must_use]
    pub fn run_id(&self) -> u64 {
        match self {
            Self::Progress { run_id, .. } | Self::Finished { run_id, .. } => *run_id,
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished { .. })
    }
}

/// Summary of a finished run for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub status: RunStatus,
    pub generated: usize,
    pub target: usize,
    pub attempts: u64,
    pub budget_exhausted: bool,
    pub duration: Duration,
    /// Display label of the selected groups.
    pub operators: String,
    /// Failure reason, when `status` is `Failed`.
    pub error: Option<String>,
}

impl RunSummary {
    #[must_use]
    pub fn from_outcome(
        outcome: &RunOutcome,
        target: usize,
        duration: Duration,
        operators: impl Into<String>,
    ) -> Self {
        let (generated, attempts, budget_exhausted) = match outcome.result() {
            Some(r) => (r.len(), r.attempts, r.budget_exhausted()),
            None => (0, 0, false),
        };
        let error = match outcome {
            RunOutcome::Failed(e) => Some(e.to_string()),
            _ => None,
        };
        Self {
            status: outcome.status(),
            generated,
            target,
            attempts,
            budget_exhausted,
            duration,
            operators: operators.into(),
            error,
        }
    }
}

/// Trait for reporting progress to the user.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress update.
    fn report(&self, update: &GenerationProgress);

    /// Report completion.
    fn complete(&self);
}

/// Trait for presenting results to the user.
pub trait ResultPresenter: Send + Sync {
    /// Present the first `limit` numbers of a result list.
    fn present_numbers(&self, numbers: &[PhoneNumber], limit: usize);

    /// Present the run summary.
    fn present_summary(&self, summary: &RunSummary);

    /// Present an error.
    fn present_error(&self, error: &str);
}

/// Null progress reporter (does nothing).
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {
    fn report(&self, _update: &GenerationProgress) {}
    fn complete(&self) {}
}
