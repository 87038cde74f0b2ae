//! # phonegen-orchestration
//!
//! Generation sessions: background execution, cooperative cancellation,
//! and ordered delivery of progress and completion events.

pub mod interfaces;
pub mod session;

pub use interfaces::{ProgressReporter, ResultPresenter, RunOutcome, RunStatus, RunSummary, SessionEvent};
pub use session::{GenerationSession, SessionConfig, SessionState, DEFAULT_CANCEL_TIMEOUT};
