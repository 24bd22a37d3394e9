// TestDependencies - mock implementations for testing
//
// Provides spy/fault-injecting services that can be assembled into AuthDeps.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::{
    AuthDeps, FixedClock, InMemoryUserRepository, MemorySnapshotStore, OtpDispatch, OtpProvider,
    SnapshotStore, StoreError,
};
use crate::domains::auth::PersistedSnapshot;

// =============================================================================
// Recording OTP provider
// =============================================================================

/// Arguments captured from a verify call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyCallArgs {
    pub phone_number: String,
    pub session_token: String,
    pub code: String,
}

pub struct RecordingOtpProvider {
    send_calls: Arc<Mutex<Vec<String>>>,
    verify_calls: Arc<Mutex<Vec<VerifyCallArgs>>>,
    rejected_codes: Arc<Mutex<Vec<String>>>,
    fail_sends: AtomicBool,
    fail_verifies: AtomicBool,
}

impl RecordingOtpProvider {
    pub fn new() -> Self {
        Self {
            send_calls: Arc::new(Mutex::new(Vec::new())),
            verify_calls: Arc::new(Mutex::new(Vec::new())),
            rejected_codes: Arc::new(Mutex::new(Vec::new())),
            fail_sends: AtomicBool::new(false),
            fail_verifies: AtomicBool::new(false),
        }
    }

    /// Treat this code as wrong
    pub fn reject_code(self, code: &str) -> Self {
        self.rejected_codes.lock().unwrap().push(code.to_string());
        self
    }

    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_verifies(&self, fail: bool) {
        self.fail_verifies.store(fail, Ordering::SeqCst);
    }

    /// Get all phone numbers a code was sent to
    pub fn send_calls(&self) -> Vec<String> {
        self.send_calls.lock().unwrap().clone()
    }

    /// Get all verify calls with their arguments
    pub fn verify_calls(&self) -> Vec<VerifyCallArgs> {
        self.verify_calls.lock().unwrap().clone()
    }
}

impl Default for RecordingOtpProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OtpProvider for RecordingOtpProvider {
    async fn send_otp(&self, phone_number: &str) -> Result<OtpDispatch> {
        self.send_calls
            .lock()
            .unwrap()
            .push(phone_number.to_string());

        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(anyhow!("SMS gateway unavailable"));
        }

        Ok(OtpDispatch {
            session_token: format!("test-{}", Uuid::new_v4()),
        })
    }

    async fn verify_otp(
        &self,
        phone_number: &str,
        session_token: &str,
        code: &str,
    ) -> Result<bool> {
        self.verify_calls.lock().unwrap().push(VerifyCallArgs {
            phone_number: phone_number.to_string(),
            session_token: session_token.to_string(),
            code: code.to_string(),
        });

        if self.fail_verifies.load(Ordering::SeqCst) {
            return Err(anyhow!("verification service timed out"));
        }

        let rejected = self.rejected_codes.lock().unwrap();
        Ok(!rejected.iter().any(|c| c == code))
    }
}

// =============================================================================
// Fault-injecting snapshot store
// =============================================================================

/// Memory store whose saves can be made to fail.
#[derive(Default)]
pub struct FlakySnapshotStore {
    inner: MemorySnapshotStore,
    fail_saves: AtomicBool,
    save_count: Mutex<usize>,
}

impl FlakySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inner(inner: MemorySnapshotStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        *self.save_count.lock().unwrap()
    }

    pub async fn raw(&self) -> Option<String> {
        self.inner.raw().await
    }
}

#[async_trait]
impl SnapshotStore for FlakySnapshotStore {
    async fn load(&self) -> std::result::Result<Option<PersistedSnapshot>, StoreError> {
        self.inner.load().await
    }

    async fn save(&self, snapshot: &PersistedSnapshot) -> std::result::Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "storage is read-only",
            )));
        }
        self.inner.save(snapshot).await?;
        *self.save_count.lock().unwrap() += 1;
        Ok(())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub struct TestDependencies {
    pub otp: Arc<RecordingOtpProvider>,
    pub users: Arc<InMemoryUserRepository>,
    pub store: Arc<FlakySnapshotStore>,
    pub clock: Arc<FixedClock>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            otp: Arc::new(RecordingOtpProvider::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            store: Arc::new(FlakySnapshotStore::new()),
            clock: Arc::new(FixedClock::new(
                Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
            )),
        }
    }

    /// Set a recording OTP provider
    pub fn mock_otp(mut self, otp: RecordingOtpProvider) -> Self {
        self.otp = Arc::new(otp);
        self
    }

    /// Set a snapshot store (e.g. one seeded by an earlier run)
    pub fn mock_store(mut self, store: FlakySnapshotStore) -> Self {
        self.store = Arc::new(store);
        self
    }

    /// Convert into AuthDeps, keeping handles for assertions
    pub fn deps(&self) -> AuthDeps {
        AuthDeps::new(
            self.otp.clone(),
            self.users.clone(),
            self.store.clone(),
            self.clock.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
