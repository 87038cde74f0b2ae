//! Progress snapshots and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Snapshot emitted by the generator after each batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationProgress {
    /// Unique numbers accumulated so far.
    pub generated: usize,
    /// Requested number of unique numbers.
    pub target: usize,
    /// Candidates produced so far, valid or not.
    pub attempts: u64,
}

impl GenerationProgress {
    #[must_use]
    pub fn new(generated: usize, target: usize, attempts: u64) -> Self {
        Self {
            generated,
            target,
            attempts,
        }
    }

    /// Completion as a fraction in [0.0, 1.0].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.target == 0 {
            return 1.0;
        }
        (self.generated as f64 / self.target as f64).min(1.0)
    }

    /// Whether the target has been reached.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.generated >= self.target
    }
}

/// Cooperative cancellation token backed by an atomic flag.
///
/// Clones share the same flag.
///
/// # Example
/// ```
/// use phonegen_core::progress::CancellationToken;
///
/// let token = CancellationToken::new();
/// let observer = token.clone();
/// assert!(!observer.is_cancelled());
///
/// token.cancel();
/// assert!(observer.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if cancellation has been requested.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_fraction() {
        let p = GenerationProgress::new(250, 1000, 260);
        assert!((p.fraction() - 0.25).abs() < f64::EPSILON);
        assert!(!p.is_complete());
    }

    #[test]
    fn progress_complete() {
        let p = GenerationProgress::new(10, 10, 10);
        assert!((p.fraction() - 1.0).abs() < f64::EPSILON);
        assert!(p.is_complete());
    }

    #[test]
    fn progress_zero_target_is_complete() {
        let p = GenerationProgress::new(0, 0, 0);
        assert!((p.fraction() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cancellation_token() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn cancellation_propagates_through_clone() {
        let token1 = CancellationToken::new();
        let token2 = token1.clone();
        token1.cancel();
        assert!(token2.is_cancelled());
    }

    #[test]
    fn cancellation_visible_across_threads() {
        let token = CancellationToken::new();
        let remote = token.clone();
        let handle = std::thread::spawn(move || {
            while !remote.is_cancelled() {
                std::thread::yield_now();
            }
        });
        token.cancel();
        handle.join().unwrap();
    }

    #[test]
    fn fresh_tokens_are_independent() {
        let first = CancellationToken::new();
        first.cancel();
        let second = CancellationToken::default();
        assert!(!second.is_cancelled());
    }
}
