use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{AuthState, AuthenticatedUser};

/// The part of the auth state that survives a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    pub user: Option<AuthenticatedUser>,
    #[serde(rename = "isAuthenticated")]
    pub is_authenticated: bool,
}

impl PersistedSnapshot {
    pub fn signed_out() -> Self {
        Self {
            user: None,
            is_authenticated: false,
        }
    }

    pub fn authenticated(user: AuthenticatedUser) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
        }
    }

    pub fn of(state: &AuthState) -> Self {
        match state.user() {
            Some(user) => Self::authenticated(user.clone()),
            None => Self::signed_out(),
        }
    }

    /// State to resume from. Pending verifications are never persisted, so a
    /// restart lands either signed in or signed out. A snapshot whose flag
    /// disagrees with its user is treated as signed out.
    pub fn into_state(self) -> AuthState {
        match (self.is_authenticated, self.user) {
            (true, Some(user)) => AuthState::LoggedIn(user),
            (false, None) => AuthState::LoggedOut,
            (flag, user) => {
                warn!(
                    is_authenticated = flag,
                    has_user = user.is_some(),
                    "inconsistent auth snapshot, starting signed out"
                );
                AuthState::LoggedOut
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn farmer() -> AuthenticatedUser {
        AuthenticatedUser {
            id: "user-1".to_string(),
            phone: "9876543210".to_string(),
            name: "Demo Farmer".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(PersistedSnapshot::authenticated(farmer())).unwrap();
        assert_eq!(json["isAuthenticated"], true);
        assert_eq!(json["user"]["phone"], "9876543210");
        assert_eq!(json["user"]["created_at"], "2024-06-01T09:00:00Z");
    }

    #[test]
    fn test_restores_logged_in() {
        let state = PersistedSnapshot::authenticated(farmer()).into_state();
        assert_eq!(state, AuthState::LoggedIn(farmer()));
    }

    #[test]
    fn test_flag_without_user_is_logged_out() {
        let snapshot = PersistedSnapshot {
            user: None,
            is_authenticated: true,
        };
        assert_eq!(snapshot.into_state(), AuthState::LoggedOut);
    }

    #[test]
    fn test_user_without_flag_is_logged_out() {
        let snapshot = PersistedSnapshot {
            user: Some(farmer()),
            is_authenticated: false,
        };
        assert_eq!(snapshot.into_state(), AuthState::LoggedOut);
    }

    #[test]
    fn test_snapshot_of_logged_in_state() {
        let snapshot = PersistedSnapshot::of(&AuthState::LoggedIn(farmer()));
        assert!(snapshot.is_authenticated);
        assert_eq!(snapshot.user, Some(farmer()));

        assert_eq!(
            PersistedSnapshot::of(&AuthState::LoggedOut),
            PersistedSnapshot::signed_out()
        );
    }
}
