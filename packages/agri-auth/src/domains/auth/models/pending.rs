use chrono::{DateTime, Utc};

/// Why a code was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationPurpose {
    Login,
    Register { name: String },
}

impl VerificationPurpose {
    pub fn registration_name(&self) -> Option<&str> {
        match self {
            VerificationPurpose::Login => None,
            VerificationPurpose::Register { name } => Some(name),
        }
    }
}

/// A login or registration waiting for its OTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSession {
    pub phone_number: String,
    pub session_token: String,
    pub purpose: VerificationPurpose,
    /// When the current code was sent; expiry counts from here.
    pub issued_at: DateTime<Utc>,
}

impl PendingSession {
    pub fn is_registration(&self) -> bool {
        matches!(self.purpose, VerificationPurpose::Register { .. })
    }
}
