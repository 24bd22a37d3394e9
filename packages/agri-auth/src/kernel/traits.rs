// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only. The login state machine lives in
// domains::auth and talks to the outside world exclusively through these.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::store::StoreError;
use crate::domains::auth::{AuthenticatedUser, PersistedSnapshot};

// =============================================================================
// OTP Delivery Trait (Infrastructure - SMS/OTP)
// =============================================================================

/// Handle for a code that has been sent out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpDispatch {
    /// Opaque token identifying the pending verification.
    pub session_token: String,
}

#[async_trait]
pub trait OtpProvider: Send + Sync {
    /// Send a one-time code to the phone number
    async fn send_otp(&self, phone_number: &str) -> Result<OtpDispatch>;

    /// Check a code against the pending verification.
    ///
    /// `Ok(false)` is a rejection, `Err` is a delivery/transport failure.
    async fn verify_otp(&self, phone_number: &str, session_token: &str, code: &str)
        -> Result<bool>;
}

// =============================================================================
// Identity Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Look up the user owning this phone number, creating one on first login.
    ///
    /// `registration_name` is only set when the flow started with `register`.
    async fn find_or_create(
        &self,
        phone_number: &str,
        registration_name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedUser>;
}

// =============================================================================
// Snapshot Persistence Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the stored snapshot, `None` if nothing was ever saved.
    async fn load(&self) -> std::result::Result<Option<PersistedSnapshot>, StoreError>;

    /// Replace the stored snapshot.
    async fn save(&self, snapshot: &PersistedSnapshot) -> std::result::Result<(), StoreError>;
}

// =============================================================================
// Clock Trait
// =============================================================================

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
