//! Test harness for session flow tests.
//!
//! Each test gets fresh spy dependencies and its own temporary state
//! directory for the file-backed snapshot store.

#![allow(dead_code)]

use agri_auth::kernel::{AuthDeps, FileSnapshotStore, TestDependencies};
use agri_auth::{OtpPolicy, SessionManager, AUTH_STORAGE_KEY};
use tempfile::TempDir;
use test_context::AsyncTestContext;

pub struct TestHarness {
    pub deps: TestDependencies,
    pub state_dir: TempDir,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        Self {
            deps: TestDependencies::new(),
            state_dir: tempfile::tempdir().expect("Failed to create state dir"),
        }
    }

    async fn teardown(self) {
        // TempDir removes itself on drop
    }
}

impl TestHarness {
    /// Session backed by the in-memory spy store.
    pub fn session(&self) -> SessionManager {
        SessionManager::new(self.deps.deps(), OtpPolicy::default())
    }

    /// A new "process" reading whatever the spy store holds.
    pub async fn restart(&self) -> SessionManager {
        SessionManager::restore(self.deps.deps(), OtpPolicy::default()).await
    }

    pub fn file_store(&self) -> FileSnapshotStore {
        FileSnapshotStore::new(self.state_dir.path(), AUTH_STORAGE_KEY)
    }

    /// Dependencies persisting to the temp state directory.
    pub fn file_deps(&self) -> AuthDeps {
        let mut deps = self.deps.deps();
        deps.store = std::sync::Arc::new(self.file_store());
        deps
    }

    /// A new "process" reading the file-backed snapshot.
    pub async fn restart_from_disk(&self) -> SessionManager {
        SessionManager::restore(self.file_deps(), OtpPolicy::default()).await
    }
}
