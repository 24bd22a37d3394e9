//! Session manager - the login state machine.
//!
//! ```text
//!   LoggedOut ──login/register──▶ AwaitingOtp ──verify_otp──▶ LoggedIn
//!       ▲                             │  ▲ resend_otp               │
//!       └──────────── logout ─────────┴──┴──────────────────────────┘
//! ```
//!
//! Every transition writes the `{user, isAuthenticated}` snapshot before the
//! in-memory state changes, so a failed write leaves the manager where it was.
//! `logout` is the exception: it always clears, even if the write fails.

use tracing::{error, info, warn};

use super::models::{
    AuthState, AuthenticatedUser, PendingSession, PersistedSnapshot, VerificationPurpose,
};
use super::policy::{is_well_formed_code, OtpPolicy, OTP_CODE_LENGTH};
use super::{AuthError, AuthOutcome};
use crate::common::mask_phone_number;
use crate::kernel::AuthDeps;

const OTP_SENT: &str = "OTP sent successfully";
const OTP_SEND_FAILED: &str = "Failed to send OTP";
const REGISTRATION_STARTED: &str = "Registration initiated. OTP sent for verification.";
const REGISTRATION_FAILED: &str = "Failed to register";
const OTP_VERIFIED: &str = "OTP verified successfully";
const OTP_INVALID: &str = "Invalid OTP";
const OTP_VERIFY_FAILED: &str = "Failed to verify OTP";
const OTP_RESENT: &str = "A new OTP has been sent to your phone";

pub struct SessionManager {
    deps: AuthDeps,
    policy: OtpPolicy,
    state: AuthState,
}

impl SessionManager {
    /// Start signed out without reading the store.
    pub fn new(deps: AuthDeps, policy: OtpPolicy) -> Self {
        Self {
            deps,
            policy,
            state: AuthState::LoggedOut,
        }
    }

    /// Start from whatever the snapshot store holds.
    ///
    /// An unreadable snapshot is logged and treated as signed out.
    pub async fn restore(deps: AuthDeps, policy: OtpPolicy) -> Self {
        let state = match deps.store.load().await {
            Ok(Some(snapshot)) => snapshot.into_state(),
            Ok(None) => AuthState::LoggedOut,
            Err(e) => {
                warn!("Failed to read auth snapshot, starting signed out: {}", e);
                AuthState::LoggedOut
            }
        };
        info!(state = state.name(), "session restored");
        Self {
            deps,
            policy,
            state,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn policy(&self) -> &OtpPolicy {
        &self.policy
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.state.phone_number()
    }

    pub fn session_token(&self) -> Option<&str> {
        self.state.session_token()
    }

    pub fn user(&self) -> Option<&AuthenticatedUser> {
        self.state.user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn snapshot(&self) -> PersistedSnapshot {
        PersistedSnapshot::of(&self.state)
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Send a code to `phone_number` and wait for it.
    ///
    /// The number is taken as given; format checks belong to the caller
    /// (see `forms::validate_phone`). Starting a login while signed in drops
    /// the current user.
    pub async fn login(&mut self, phone_number: &str) -> AuthOutcome {
        match self.start(phone_number, VerificationPurpose::Login).await {
            Ok(()) => AuthOutcome::ok(OTP_SENT),
            Err(e) => {
                error!("Login error: {}", e);
                AuthOutcome::failed(failure_message(&e, OTP_SEND_FAILED))
            }
        }
    }

    /// Same as `login`, remembering `name` for the account to be created.
    pub async fn register(&mut self, phone_number: &str, name: &str) -> AuthOutcome {
        let purpose = VerificationPurpose::Register {
            name: name.to_string(),
        };
        match self.start(phone_number, purpose).await {
            Ok(()) => AuthOutcome::ok(REGISTRATION_STARTED),
            Err(e) => {
                error!("Registration error: {}", e);
                AuthOutcome::failed(failure_message(&e, REGISTRATION_FAILED))
            }
        }
    }

    pub async fn verify_otp(&mut self, code: &str) -> AuthOutcome {
        match self.try_verify(code).await {
            Ok(user) => {
                info!(user_id = %user.id, "OTP verified");
                AuthOutcome::ok(OTP_VERIFIED)
            }
            Err(AuthError::Validation(reason)) => {
                warn!("OTP rejected: {}", reason);
                AuthOutcome::failed(OTP_INVALID)
            }
            Err(e) => {
                error!("OTP verification error: {}", e);
                AuthOutcome::failed(failure_message(&e, OTP_VERIFY_FAILED))
            }
        }
    }

    /// Send a fresh code for the pending session, once the cooldown has passed.
    pub async fn resend_otp(&mut self) -> AuthOutcome {
        match self.try_resend().await {
            Ok(()) => AuthOutcome::ok(OTP_RESENT),
            Err(e) => {
                warn!("Resend refused: {}", e);
                AuthOutcome::failed(failure_message(&e, OTP_SEND_FAILED))
            }
        }
    }

    /// Replace the signed-in user directly; `None` signs out.
    pub async fn set_user(&mut self, user: Option<AuthenticatedUser>) -> Result<(), AuthError> {
        let next = match user {
            Some(user) => AuthState::LoggedIn(user),
            None => AuthState::LoggedOut,
        };
        self.commit(next).await
    }

    /// Clear everything. Always ends signed out.
    pub async fn logout(&mut self) {
        self.state = AuthState::LoggedOut;
        match self.deps.store.save(&PersistedSnapshot::signed_out()).await {
            Ok(()) => info!("logged out"),
            Err(e) => error!("Logged out but failed to clear stored session: {}", e),
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    async fn start(
        &mut self,
        phone_number: &str,
        purpose: VerificationPurpose,
    ) -> Result<(), AuthError> {
        let dispatch = self
            .deps
            .otp
            .send_otp(phone_number)
            .await
            .map_err(AuthError::Delivery)?;

        let pending = PendingSession {
            phone_number: phone_number.to_string(),
            session_token: dispatch.session_token,
            purpose,
            issued_at: self.deps.clock.now(),
        };
        info!(
            phone = %mask_phone_number(phone_number),
            registering = pending.is_registration(),
            "OTP sent"
        );
        self.commit(AuthState::AwaitingOtp(pending)).await
    }

    async fn try_verify(&mut self, code: &str) -> Result<AuthenticatedUser, AuthError> {
        if !is_well_formed_code(code) {
            return Err(AuthError::Validation(format!(
                "expected {} digits, got {:?}",
                OTP_CODE_LENGTH,
                code
            )));
        }

        let pending = self
            .state
            .pending()
            .cloned()
            .ok_or(AuthError::NoPendingVerification)?;

        let now = self.deps.clock.now();
        if let Some(ttl) = self.policy.ttl {
            if now - pending.issued_at >= ttl {
                self.commit(AuthState::LoggedOut).await?;
                return Err(AuthError::OtpExpired);
            }
        }

        let accepted = self
            .deps
            .otp
            .verify_otp(&pending.phone_number, &pending.session_token, code)
            .await
            .map_err(AuthError::Delivery)?;
        if !accepted {
            return Err(AuthError::Validation("code not accepted".to_string()));
        }

        let user = self
            .deps
            .users
            .find_or_create(
                &pending.phone_number,
                pending.purpose.registration_name(),
                now,
            )
            .await?;

        self.commit(AuthState::LoggedIn(user.clone())).await?;
        Ok(user)
    }

    async fn try_resend(&mut self) -> Result<(), AuthError> {
        let pending = self
            .state
            .pending()
            .cloned()
            .ok_or(AuthError::NoPendingVerification)?;

        let now = self.deps.clock.now();
        let elapsed = now - pending.issued_at;
        if elapsed < self.policy.resend_cooldown {
            let remaining = self.policy.resend_cooldown - elapsed;
            // Round up so "wait 0s" is never reported.
            let retry_in_secs = (remaining.num_milliseconds() + 999) / 1000;
            return Err(AuthError::ResendTooSoon { retry_in_secs });
        }

        let dispatch = self
            .deps
            .otp
            .send_otp(&pending.phone_number)
            .await
            .map_err(AuthError::Delivery)?;

        let refreshed = PendingSession {
            session_token: dispatch.session_token,
            issued_at: now,
            ..pending
        };
        info!(phone = %mask_phone_number(&refreshed.phone_number), "OTP resent");
        self.commit(AuthState::AwaitingOtp(refreshed)).await
    }

    /// Persist the snapshot of `next`, then make it current.
    async fn commit(&mut self, next: AuthState) -> Result<(), AuthError> {
        self.deps.store.save(&PersistedSnapshot::of(&next)).await?;
        self.state = next;
        Ok(())
    }
}

/// Message shown for a failed operation. Flow errors carry their own wording,
/// infrastructure errors get the operation's generic message.
fn failure_message(error: &AuthError, generic: &str) -> String {
    match error {
        AuthError::Validation(_) => OTP_INVALID.to_string(),
        AuthError::NoPendingVerification
        | AuthError::OtpExpired
        | AuthError::ResendTooSoon { .. } => error.to_string(),
        AuthError::Delivery(_) | AuthError::Store(_) | AuthError::Unknown(_) => {
            generic.to_string()
        }
    }
}
