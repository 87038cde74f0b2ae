//! Generation session: one background run at a time.
//!
//! The session owns the run's cancellation token and the receiving end of a
//! fresh event channel. The background thread is the only writer of the
//! accumulating result; the token is the only state shared in the other
//! direction.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use tracing::{debug, info, warn};

use phonegen_core::constants::PROGRESS_LOG_INTERVAL_MS;
use phonegen_core::generator::{BatchGenerator, GenError, Generator};
use phonegen_core::observer::ProgressSubject;
use phonegen_core::observers::{ChannelObserver, LoggingObserver};
use phonegen_core::options::GenerationOptions;
use phonegen_core::prefix::PrefixSelector;
use phonegen_core::progress::{CancellationToken, GenerationProgress};
use phonegen_core::request::GenerationRequest;

use crate::interfaces::{RunOutcome, RunStatus, SessionEvent};

/// Default bound on how long `cancel()` waits for the run to stop.
pub const DEFAULT_CANCEL_TIMEOUT: Duration = Duration::from_secs(2);

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long `cancel()` waits for the background run to acknowledge.
    pub cancel_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cancel_timeout: DEFAULT_CANCEL_TIMEOUT,
        }
    }
}

/// Session lifecycle state.
///
/// The terminal states are transient: a session passes through one of them
/// when a run ends and is back in `Idle` before control returns to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl From<RunStatus> for SessionState {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Completed => Self::Completed,
            RunStatus::Cancelled => Self::Cancelled,
            RunStatus::Failed => Self::Failed,
        }
    }
}

struct ActiveRun {
    run_id: u64,
    cancel: CancellationToken,
    events: Receiver<SessionEvent>,
    handle: JoinHandle<()>,
}

/// Drives one `Generator` on a background thread per run.
pub struct GenerationSession {
    generator: Arc<dyn Generator>,
    selector: PrefixSelector,
    config: SessionConfig,
    state: SessionState,
    active: Option<ActiveRun>,
    next_run_id: u64,
    last_status: Option<RunStatus>,
}

impl GenerationSession {
    /// Create a session around an explicit generator and group table.
    #[must_use]
    pub fn new(
        generator: Arc<dyn Generator>,
        selector: PrefixSelector,
        config: SessionConfig,
    ) -> Self {
        Self {
            generator,
            selector,
            config,
            state: SessionState::Idle,
            active: None,
            next_run_id: 1,
            last_status: None,
        }
    }

    /// Session over the standard group table using a `BatchGenerator`.
    #[must_use]
    pub fn with_options(opts: GenerationOptions, config: SessionConfig) -> Self {
        Self::new(
            Arc::new(BatchGenerator::new(opts)),
            PrefixSelector::standard(),
            config,
        )
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Id of the in-flight run, if any.
    #[must_use]
    pub fn active_run_id(&self) -> Option<u64> {
        self.active.as_ref().map(|a| a.run_id)
    }

    /// Status of the most recently finished run.
    #[must_use]
    pub fn last_status(&self) -> Option<RunStatus> {
        self.last_status
    }

    #[must_use]
    pub fn selector(&self) -> &PrefixSelector {
        &self.selector
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Validate `request` and start it on a background thread.
    ///
    /// Returns the id that tags every event of the new run.
    ///
    /// # Errors
    ///
    /// `AlreadyRunning` if a run is in flight, `InvalidRequest` if the
    /// request fails validation, `ResourceExhaustion` if no thread can be
    /// spawned.
    pub fn start(&mut self, request: &GenerationRequest) -> Result<u64, GenError> {
        if self.active.is_some() {
            return Err(GenError::AlreadyRunning);
        }
        let prefixes = request.validate(&self.selector)?;

        let run_id = self.next_run_id;
        let cancel = CancellationToken::new();
        let (tx, rx) = crossbeam_channel::unbounded();
        let generator = Arc::clone(&self.generator);
        let target = request.target;
        let thread_cancel = cancel.clone();

        let handle = thread::Builder::new()
            .name(format!("phonegen-run-{run_id}"))
            .spawn(move || {
                run_in_background(
                    generator.as_ref(),
                    &prefixes,
                    target,
                    &thread_cancel,
                    run_id,
                    &tx,
                );
            })
            .map_err(|e| {
                GenError::ResourceExhaustion(format!("cannot spawn generation thread: {e}"))
            })?;

        self.next_run_id += 1;
        self.active = Some(ActiveRun {
            run_id,
            cancel,
            events: rx,
            handle,
        });
        self.state = SessionState::Running;
        info!(
            run_id,
            target,
            groups = ?request.groups,
            generator = self.generator.name(),
            "Generation run started"
        );
        Ok(run_id)
    }

    /// Request cancellation and wait for the run to stop.
    ///
    /// Returns `Ok(None)` when no run is active. Otherwise returns the
    /// run's outcome, normally `Cancelled` with the partial result. Progress
    /// events still queued are discarded.
    ///
    /// # Errors
    ///
    /// `CancelTimeout` if the run does not stop within the configured
    /// timeout. The run is then detached: its events are dropped and the
    /// session is back in `Idle`.
    pub fn cancel(&mut self) -> Result<Option<RunOutcome>, GenError> {
        let Some(active) = self.active.take() else {
            return Ok(None);
        };
        active.cancel.cancel();
        info!(run_id = active.run_id, "Cancellation requested");

        let timeout = self.config.cancel_timeout;
        // A timeout too large to express as an instant means wait unbounded.
        let deadline = Instant::now().checked_add(timeout);
        loop {
            let received = match deadline {
                Some(deadline) => active
                    .events
                    .recv_timeout(deadline.saturating_duration_since(Instant::now())),
                None => active
                    .events
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(SessionEvent::Finished { outcome, .. }) => {
                    self.finish_run(active, &outcome);
                    return Ok(Some(outcome));
                }
                Ok(SessionEvent::Progress { .. }) => {}
                Err(RecvTimeoutError::Timeout) => {
                    warn!(
                        run_id = active.run_id,
                        ?timeout,
                        "Run did not stop in time; detaching"
                    );
                    self.state = SessionState::Idle;
                    self.last_status = Some(RunStatus::Cancelled);
                    return Err(GenError::CancelTimeout(timeout));
                }
                Err(RecvTimeoutError::Disconnected) => {
                    let outcome = lost_run_outcome();
                    self.finish_run(active, &outcome);
                    return Ok(Some(outcome));
                }
            }
        }
    }

    /// Next queued event of the active run, without blocking.
    pub fn try_next_event(&mut self) -> Option<SessionEvent> {
        let active = self.active.as_ref()?;
        let event = match active.events.try_recv() {
            Ok(event) => event,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => lost_run_event(active.run_id),
        };
        Some(self.observe(event))
    }

    /// Next event of the active run, waiting up to `timeout`.
    pub fn next_event_timeout(&mut self, timeout: Duration) -> Option<SessionEvent> {
        let active = self.active.as_ref()?;
        let event = match active.events.recv_timeout(timeout) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => return None,
            Err(RecvTimeoutError::Disconnected) => lost_run_event(active.run_id),
        };
        Some(self.observe(event))
    }

    /// Block until the active run finishes, feeding progress to `on_progress`.
    ///
    /// Returns `None` when no run is active.
    pub fn wait_with<F>(&mut self, mut on_progress: F) -> Option<RunOutcome>
    where
        F: FnMut(&GenerationProgress),
    {
        loop {
            let active = self.active.as_ref()?;
            let event = active
                .events
                .recv()
                .unwrap_or_else(|_| lost_run_event(active.run_id));
            match self.observe(event) {
                SessionEvent::Progress { progress, .. } => on_progress(&progress),
                SessionEvent::Finished { outcome, .. } => return Some(outcome),
            }
        }
    }

    /// Block until the active run finishes.
    pub fn wait(&mut self) -> Option<RunOutcome> {
        self.wait_with(|_| {})
    }

    fn observe(&mut self, event: SessionEvent) -> SessionEvent {
        if let SessionEvent::Finished { outcome, .. } = &event {
            if let Some(active) = self.active.take() {
                self.finish_run(active, outcome);
            }
        }
        event
    }

    fn finish_run(&mut self, active: ActiveRun, outcome: &RunOutcome) {
        let status = outcome.status();
        self.state = status.into();
        if active.handle.join().is_err() {
            warn!(run_id = active.run_id, "Generation thread panicked after reporting");
        }
        match outcome {
            RunOutcome::Completed(result) if result.budget_exhausted() => warn!(
                run_id = active.run_id,
                generated = result.len(),
                target = result.target,
                attempts = result.attempts,
                "Attempt budget exhausted before reaching target"
            ),
            RunOutcome::Completed(result) | RunOutcome::Cancelled(result) => info!(
                run_id = active.run_id,
                ?status,
                generated = result.len(),
                attempts = result.attempts,
                "Generation run finished"
            ),
            RunOutcome::Failed(err) => warn!(run_id = active.run_id, %err, "Generation run failed"),
        }
        self.state = SessionState::Idle;
        self.last_status = Some(status);
    }
}

impl Default for GenerationSession {
    fn default() -> Self {
        Self::with_options(GenerationOptions::default(), SessionConfig::default())
    }
}

impl Drop for GenerationSession {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            debug!(run_id = active.run_id, "Session dropped; cancelling run");
            active.cancel.cancel();
        }
    }
}

/// Body of the background thread. Always ends by sending `Finished`.
fn run_in_background(
    generator: &dyn Generator,
    prefixes: &[String],
    target: usize,
    cancel: &CancellationToken,
    run_id: u64,
    tx: &Sender<SessionEvent>,
) {
    let started = Instant::now();
    let subject = ProgressSubject::new();
    subject.register(Arc::new(ChannelObserver::with_mapper(
        tx.clone(),
        move |progress| SessionEvent::Progress { run_id, progress },
    )));
    subject.register(Arc::new(LoggingObserver::new(PROGRESS_LOG_INTERVAL_MS)));

    let run = panic::catch_unwind(AssertUnwindSafe(|| {
        generator.generate(prefixes, target, cancel, &subject)
    }));
    let outcome = match run {
        Ok(Ok(result)) if result.is_cancelled() => RunOutcome::Cancelled(result),
        Ok(Ok(result)) => RunOutcome::Completed(result),
        Ok(Err(err)) => RunOutcome::Failed(err),
        Err(payload) => RunOutcome::Failed(GenError::Internal(panic_message(payload.as_ref()))),
    };

    let _ = tx.send(SessionEvent::Finished {
        run_id,
        outcome,
        elapsed: started.elapsed(),
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "generator panicked".to_string()
    }
}

fn lost_run_outcome() -> RunOutcome {
    RunOutcome::Failed(GenError::Internal(
        "background run exited without a result".into(),
    ))
}

fn lost_run_event(run_id: u64) -> SessionEvent {
    SessionEvent::Finished {
        run_id,
        outcome: lost_run_outcome(),
        elapsed: Duration::ZERO,
    }
}
