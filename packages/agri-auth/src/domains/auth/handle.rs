use std::sync::Arc;
use tokio::sync::Mutex;

use super::{
    AuthError, AuthOutcome, AuthState, AuthenticatedUser, OtpPolicy, PersistedSnapshot,
    SessionManager,
};
use crate::kernel::AuthDeps;

/// Shareable handle to one session.
///
/// Operations queue on the inner mutex, so a `verify_otp` racing a `logout`
/// runs one after the other instead of interleaving their writes.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionManager>>,
}

impl SessionHandle {
    pub fn new(manager: SessionManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    pub async fn restore(deps: AuthDeps, policy: OtpPolicy) -> Self {
        Self::new(SessionManager::restore(deps, policy).await)
    }

    pub async fn login(&self, phone_number: &str) -> AuthOutcome {
        self.inner.lock().await.login(phone_number).await
    }

    pub async fn register(&self, phone_number: &str, name: &str) -> AuthOutcome {
        self.inner.lock().await.register(phone_number, name).await
    }

    pub async fn verify_otp(&self, code: &str) -> AuthOutcome {
        self.inner.lock().await.verify_otp(code).await
    }

    pub async fn resend_otp(&self) -> AuthOutcome {
        self.inner.lock().await.resend_otp().await
    }

    pub async fn set_user(&self, user: Option<AuthenticatedUser>) -> Result<(), AuthError> {
        self.inner.lock().await.set_user(user).await
    }

    pub async fn logout(&self) {
        self.inner.lock().await.logout().await
    }

    pub async fn state(&self) -> AuthState {
        self.inner.lock().await.state().clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.lock().await.is_authenticated()
    }

    pub async fn snapshot(&self) -> PersistedSnapshot {
        self.inner.lock().await.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::TestDependencies;

    #[tokio::test]
    async fn test_concurrent_verify_and_logout_serialize() {
        let test_deps = TestDependencies::new();
        let handle = SessionHandle::new(SessionManager::new(
            test_deps.deps(),
            OtpPolicy::default(),
        ));
        handle.login("9876543210").await;

        let verifier = handle.clone();
        let (verified, ()) = tokio::join!(
            async move { verifier.verify_otp("1234").await },
            handle.logout()
        );

        // Whichever ran second wins outright; the state is never half of each.
        let state = handle.state().await;
        let snapshot = handle.snapshot().await;
        match state {
            AuthState::LoggedIn(ref user) => {
                assert!(verified.success);
                assert_eq!(user.phone, "9876543210");
                assert!(snapshot.is_authenticated);
            }
            AuthState::LoggedOut => {
                assert!(!snapshot.is_authenticated);
                assert!(snapshot.user.is_none());
            }
            AuthState::AwaitingOtp(_) => panic!("pending session survived logout"),
        }
    }

    #[tokio::test]
    async fn test_set_user_through_handle() {
        let test_deps = TestDependencies::new();
        let handle = SessionHandle::new(SessionManager::new(
            test_deps.deps(),
            OtpPolicy::default(),
        ));
        let user = AuthenticatedUser {
            id: "user-1".to_string(),
            phone: "9876543210".to_string(),
            name: "Ramesh".to_string(),
            created_at: chrono::Utc::now(),
        };

        handle.set_user(Some(user.clone())).await.unwrap();
        assert!(handle.is_authenticated().await);
        assert_eq!(handle.snapshot().await.user, Some(user));
        assert!(test_deps.store.raw().await.unwrap().contains("Ramesh"));

        handle.set_user(None).await.unwrap();
        assert!(!handle.is_authenticated().await);
        assert!(matches!(handle.state().await, AuthState::LoggedOut));
        assert!(!handle.snapshot().await.is_authenticated);
    }
}
