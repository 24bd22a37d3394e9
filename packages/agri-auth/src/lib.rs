// AgriConnect auth core
//
// Phone + OTP login for the AgriConnect app. The session manager owns the
// login state machine; delivery, identity, persistence and time are injected
// through the kernel traits so the whole flow runs deterministically in tests.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
pub use domains::auth::{
    AuthError, AuthOutcome, AuthState, AuthenticatedUser, OtpPolicy, PendingSession,
    PersistedSnapshot, SessionHandle, SessionManager, VerificationPurpose,
};
pub use kernel::AuthDeps;
