//! # phonegen-core
//!
//! Core library for the phonegen bulk phone-number generator.
//! Resolves carrier groups into prefixes, validates numbers against the
//! canonical numbering plan, and generates unique numbers in cancellable,
//! progress-reporting batches.

pub mod constants;
pub mod generator;
pub mod number;
pub mod observer;
pub mod observers;
pub mod options;
pub mod prefix;
pub mod progress;
pub mod request;
pub mod validator;

// Re-exports
pub use constants::{exit_codes, DEFAULT_ATTEMPT_MULTIPLIER, DEFAULT_BATCH_SIZE, PHONE_NUMBER_LEN};
pub use generator::{BatchGenerator, GenError, GenerationResult, Generator, StopReason};
pub use number::{InvalidNumber, PhoneNumber};
pub use observer::{ProgressObserver, ProgressSubject};
pub use options::GenerationOptions;
pub use prefix::{PrefixGroup, PrefixSelector};
pub use progress::{CancellationToken, GenerationProgress};
pub use request::GenerationRequest;
pub use validator::is_valid;

/// Generate `target` unique numbers from the named groups on the calling thread.
///
/// This is a convenience function for simple use cases. For background
/// runs with progress and cancellation, use a session from
/// `phonegen-orchestration` or the `Generator` trait directly.
///
/// # Example
/// ```
/// let result = phonegen_core::generate_numbers(5, &["telecom"]).unwrap();
/// assert_eq!(result.len(), 5);
/// assert!(result.numbers.iter().all(|n| phonegen_core::is_valid(n.as_str())));
/// ```
pub fn generate_numbers(target: usize, groups: &[&str]) -> Result<GenerationResult, GenError> {
    use observers::NoOpObserver;

    let selector = PrefixSelector::standard();
    let prefixes = GenerationRequest::new(target, groups.iter().copied()).validate(&selector)?;
    let cancel = CancellationToken::new();
    BatchGenerator::default().generate(&prefixes, target, &cancel, &NoOpObserver::new())
}
