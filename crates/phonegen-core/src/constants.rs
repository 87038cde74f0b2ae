//! Constants for the numbering plan, batching, and exit codes.

/// Total length of a phone number in digits.
pub const PHONE_NUMBER_LEN: usize = 11;

/// Length of the leading block prefix.
pub const PREFIX_LEN: usize = 3;

/// Number of free digits following the prefix.
pub const SUFFIX_LEN: usize = PHONE_NUMBER_LEN - PREFIX_LEN;

/// Number of attempts processed between merges and progress reports.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Whole-run attempt budget is `target * DEFAULT_ATTEMPT_MULTIPLIER`.
pub const DEFAULT_ATTEMPT_MULTIPLIER: u64 = 50;

/// Requests above this size are logged as large.
pub const LARGE_REQUEST_THRESHOLD: usize = 100_000;

/// Requests above this size need explicit confirmation from the caller.
pub const MAX_UNCONFIRMED_REQUEST: usize = 1_000_000;

/// Minimum interval between progress log lines.
pub const PROGRESS_LOG_INTERVAL_MS: u64 = 500;

/// Process exit codes.
pub mod exit_codes {
    /// Successful execution (including a run that stopped on its attempt budget).
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// A persisted record failed validation.
    pub const ERROR_CORRUPT_RECORD: i32 = 3;
    /// Invalid request or configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// Run cancelled by user (Ctrl+C).
    pub const ERROR_CANCELED: i32 = 130;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_fills_remaining_digits() {
        assert_eq!(PREFIX_LEN + SUFFIX_LEN, PHONE_NUMBER_LEN);
        assert_eq!(SUFFIX_LEN, 8);
    }

    #[test]
    fn confirmation_threshold_above_warning_threshold() {
        assert!(MAX_UNCONFIRMED_REQUEST > LARGE_REQUEST_THRESHOLD);
    }
}
