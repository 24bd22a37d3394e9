use thiserror::Error;

use crate::kernel::StoreError;

/// Failures of the login flow.
///
/// None of these are fatal; the session manager turns each into a failed
/// `AuthOutcome` for the calling screen.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid OTP: {0}")]
    Validation(String),

    #[error("No verification in progress. Please log in again.")]
    NoPendingVerification,

    #[error("OTP has expired. Please log in again.")]
    OtpExpired,

    #[error("Please wait {retry_in_secs}s before requesting a new OTP")]
    ResendTooSoon { retry_in_secs: i64 },

    #[error("OTP delivery failed: {0}")]
    Delivery(#[source] anyhow::Error),

    #[error("Failed to save session: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Unknown(#[from] anyhow::Error),
}
