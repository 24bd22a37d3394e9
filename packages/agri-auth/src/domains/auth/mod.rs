//! Auth domain - phone number + OTP login for AgriConnect
//!
//! Responsibilities:
//! - The LoggedOut → AwaitingOtp → LoggedIn state machine (`SessionManager`)
//! - The `{user, isAuthenticated}` snapshot restored across restarts
//! - Input checks the login screens run before calling in (`forms`)
//! - The OTP screen loop shared by interactive front ends (`prompt`)

pub mod errors;
pub mod forms;
pub mod handle;
pub mod models;
pub mod outcome;
pub mod policy;
pub mod prompt;
pub mod session;

pub use errors::AuthError;
pub use handle::SessionHandle;
pub use models::{
    AuthState, AuthenticatedUser, PendingSession, PersistedSnapshot, VerificationPurpose,
};
pub use outcome::AuthOutcome;
pub use policy::{is_well_formed_code, OtpPolicy, OTP_CODE_LENGTH};
pub use prompt::{complete_verification, CodePrompt, PromptAction};
pub use session::SessionManager;
