use super::{AuthenticatedUser, PendingSession};

/// Where the login flow currently stands.
///
/// A pending token and an authenticated user can never coexist.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    LoggedOut,
    AwaitingOtp(PendingSession),
    LoggedIn(AuthenticatedUser),
}

impl AuthState {
    pub fn user(&self) -> Option<&AuthenticatedUser> {
        match self {
            AuthState::LoggedIn(user) => Some(user),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<&PendingSession> {
        match self {
            AuthState::AwaitingOtp(pending) => Some(pending),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::LoggedIn(_))
    }

    /// Phone number on file: the pending one, or the signed-in user's.
    pub fn phone_number(&self) -> Option<&str> {
        match self {
            AuthState::LoggedOut => None,
            AuthState::AwaitingOtp(pending) => Some(&pending.phone_number),
            AuthState::LoggedIn(user) => Some(&user.phone),
        }
    }

    pub fn session_token(&self) -> Option<&str> {
        self.pending().map(|p| p.session_token.as_str())
    }

    pub fn name(&self) -> &'static str {
        match self {
            AuthState::LoggedOut => "logged_out",
            AuthState::AwaitingOtp(p) if p.is_registration() => "registering",
            AuthState::AwaitingOtp(_) => "awaiting_otp",
            AuthState::LoggedIn(_) => "logged_in",
        }
    }
}
