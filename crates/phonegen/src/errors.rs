//! Error handling and exit codes.

use phonegen_core::constants::exit_codes;
use phonegen_core::generator::GenError;
use phonegen_store::StoreError;

/// Errors raised by the front end itself.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("refusing to generate {count} numbers (more than {limit}) without --force")]
    ConfirmationRequired { count: usize, limit: usize },
}

/// Exit code for a generation error.
#[must_use]
pub fn gen_exit_code(err: &GenError) -> i32 {
    match err {
        GenError::InvalidRequest(_) => exit_codes::ERROR_CONFIG,
        GenError::CancelTimeout(_) => exit_codes::ERROR_CANCELED,
        GenError::AlreadyRunning | GenError::ResourceExhaustion(_) | GenError::Internal(_) => {
            exit_codes::ERROR_GENERIC
        }
    }
}

/// Exit code for a store error.
#[must_use]
pub fn store_exit_code(err: &StoreError) -> i32 {
    match err {
        StoreError::Corrupt { .. } => exit_codes::ERROR_CORRUPT_RECORD,
        StoreError::Io { .. } => exit_codes::ERROR_GENERIC,
    }
}

/// Map any top-level error to the process exit code.
#[must_use]
pub fn handle_error(err: &anyhow::Error) -> i32 {
    if let Some(e) = err.downcast_ref::<GenError>() {
        gen_exit_code(e)
    } else if let Some(e) = err.downcast_ref::<StoreError>() {
        store_exit_code(e)
    } else if err.downcast_ref::<AppError>().is_some() {
        exit_codes::ERROR_CONFIG
    } else {
        exit_codes::ERROR_GENERIC
    }
}
