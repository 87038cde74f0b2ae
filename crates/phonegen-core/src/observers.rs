//! Concrete observer implementations.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::Sender;
use tracing::{debug, info};

use crate::observer::ProgressObserver;
use crate::progress::GenerationProgress;

type Mapper<T> = Box<dyn Fn(GenerationProgress) -> T + Send + Sync>;

/// Observer that forwards every update through a channel.
///
/// Updates are never dropped, so a receiver sees them in emission order.
/// A disconnected receiver is ignored.
pub struct ChannelObserver<T = GenerationProgress> {
    sender: Sender<T>,
    map: Mapper<T>,
}

impl ChannelObserver<GenerationProgress> {
    /// Create an observer that sends raw progress snapshots.
    #[must_use]
    pub fn new(sender: Sender<GenerationProgress>) -> Self {
        Self::with_mapper(sender, |update| update)
    }
}

impl<T: Send> ChannelObserver<T> {
    /// Create an observer that wraps each snapshot before sending it.
    #[must_use]
    pub fn with_mapper<F>(sender: Sender<T>, map: F) -> Self
    where
        F: Fn(GenerationProgress) -> T + Send + Sync + 'static,
    {
        Self {
            sender,
            map: Box::new(map),
        }
    }
}

impl<T: Send> ProgressObserver for ChannelObserver<T> {
    fn on_progress(&self, update: &GenerationProgress) {
        let _ = self.sender.send((self.map)(*update));
    }
}

/// Observer that logs progress updates with temporal throttling.
pub struct LoggingObserver {
    min_interval_ms: u64,
    last_time: AtomicU64,
}

impl LoggingObserver {
    /// Create a new logging observer with the given minimum interval.
    #[must_use]
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            min_interval_ms,
            last_time: AtomicU64::new(0),
        }
    }
}

impl ProgressObserver for LoggingObserver {
    #[allow(clippy::cast_possible_truncation)]
    fn on_progress(&self, update: &GenerationProgress) {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        let done = update.is_complete();
        let last_time = self.last_time.load(Ordering::Relaxed);
        if now.saturating_sub(last_time) < self.min_interval_ms && !done {
            return;
        }

        if done {
            info!(
                generated = update.generated,
                attempts = update.attempts,
                "Target reached"
            );
        } else {
            debug!(
                generated = update.generated,
                target = update.target,
                attempts = update.attempts,
                progress = format!("{:.1}%", update.fraction() * 100.0),
                "Progress update"
            );
        }
        self.last_time.store(now, Ordering::Relaxed);
    }
}

/// Null object pattern: does nothing with progress updates.
pub struct NoOpObserver;

impl NoOpObserver {
    /// Create a new no-op observer that discards all progress updates.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for NoOpObserver {
    fn on_progress(&self, _update: &GenerationProgress) {}
}
