//! Integration tests for restoring a session across process restarts.

mod common;

use agri_auth::kernel::{MemorySnapshotStore, SnapshotStore, TestDependencies};
use agri_auth::kernel::test_dependencies::FlakySnapshotStore;
use agri_auth::{AuthState, OtpPolicy, PersistedSnapshot, SessionHandle, SessionManager};
use common::{TestHarness, FARMER_PHONE};
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn test_verified_session_survives_restart(ctx: &TestHarness) {
    let mut session = SessionManager::new(ctx.file_deps(), OtpPolicy::default());
    session.login(FARMER_PHONE).await;
    session.verify_otp("1234").await;
    let user = session.user().cloned().unwrap();
    drop(session);

    let restored = ctx.restart_from_disk().await;
    assert!(restored.is_authenticated());
    assert_eq!(restored.user(), Some(&user));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_snapshot_round_trip_through_file(ctx: &TestHarness) {
    let mut session = SessionManager::new(ctx.file_deps(), OtpPolicy::default());
    session.login(FARMER_PHONE).await;
    session.verify_otp("1234").await;

    let stored = ctx.file_store().load().await.unwrap().unwrap();
    assert_eq!(stored, session.snapshot());
    assert!(stored.is_authenticated);
    assert_eq!(stored.user.as_ref().map(|u| u.phone.as_str()), Some(FARMER_PHONE));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_logout_clears_file(ctx: &TestHarness) {
    let mut session = SessionManager::new(ctx.file_deps(), OtpPolicy::default());
    session.login(FARMER_PHONE).await;
    session.verify_otp("1234").await;
    session.logout().await;

    let stored = ctx.file_store().load().await.unwrap().unwrap();
    assert_eq!(stored, PersistedSnapshot::signed_out());
    assert!(!ctx.restart_from_disk().await.is_authenticated());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_fresh_install_starts_logged_out(ctx: &TestHarness) {
    let restored = ctx.restart_from_disk().await;
    assert_eq!(restored.state(), &AuthState::LoggedOut);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_corrupt_file_starts_logged_out(ctx: &TestHarness) {
    std::fs::write(ctx.file_store().path(), "{\"state\":").unwrap();

    let mut restored = ctx.restart_from_disk().await;
    assert_eq!(restored.state(), &AuthState::LoggedOut);

    // The next transition overwrites the bad file
    restored.login(FARMER_PHONE).await;
    restored.verify_otp("1234").await;
    assert!(ctx.restart_from_disk().await.is_authenticated());
}

#[tokio::test]
async fn test_inconsistent_snapshot_starts_logged_out() {
    let seeded = MemorySnapshotStore::with_raw(
        r#"{"state":{"user":null,"isAuthenticated":true},"version":0}"#,
    );
    let test_deps = TestDependencies::new().mock_store(FlakySnapshotStore::with_inner(seeded));

    let restored = SessionManager::restore(test_deps.deps(), OtpPolicy::default()).await;
    assert!(!restored.is_authenticated());
    assert!(restored.user().is_none());
}

#[tokio::test]
async fn test_snapshot_written_by_web_client_is_readable() {
    // Shape written by the browser build's persisted store
    let seeded = MemorySnapshotStore::with_raw(
        r#"{"state":{"user":{"id":"user-1","phone":"9876543210","name":"Demo Farmer","created_at":"2024-06-01T09:00:00.000Z"},"isAuthenticated":true},"version":0}"#,
    );
    let test_deps = TestDependencies::new().mock_store(FlakySnapshotStore::with_inner(seeded));

    let handle = SessionHandle::restore(test_deps.deps(), OtpPolicy::default()).await;
    assert!(handle.is_authenticated().await);
    match handle.state().await {
        AuthState::LoggedIn(user) => {
            assert_eq!(user.id, "user-1");
            assert_eq!(user.name, "Demo Farmer");
        }
        other => panic!("expected LoggedIn, got {:?}", other),
    }
}
