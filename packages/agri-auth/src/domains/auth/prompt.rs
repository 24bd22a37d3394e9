//! The OTP screen loop: keep asking for a code until the session is signed
//! in, the pending verification is gone, or the user gives up.
//!
//! Front ends supply a [`CodePrompt`]; the CLI drives it from the terminal and
//! tests drive it from a script.

use anyhow::Result;
use tracing::debug;

use super::forms::validate_otp_input;
use super::{AuthError, AuthOutcome, AuthState, SessionManager};

pub const VERIFICATION_CANCELLED: &str = "Verification cancelled";

/// What the user chose on the OTP screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    Code(String),
    Resend,
    Cancel,
}

/// Source of OTP screen input.
pub trait CodePrompt {
    /// Ask for the next action. `notice` is the result of the previous step
    /// when there is something to show (a rejected code, a resend).
    fn next_action(&mut self, notice: Option<&AuthOutcome>) -> Result<PromptAction>;
}

/// Run the OTP screen against a session that is awaiting a code.
///
/// Returns the outcome of the last step: the successful verification, the
/// failure that ended the pending session, or a cancellation.
pub async fn complete_verification<P: CodePrompt>(
    session: &mut SessionManager,
    prompt: &mut P,
) -> Result<AuthOutcome> {
    if !matches!(session.state(), AuthState::AwaitingOtp(_)) {
        return Ok(AuthOutcome::failed(
            AuthError::NoPendingVerification.to_string(),
        ));
    }

    let mut notice: Option<AuthOutcome> = None;
    loop {
        match prompt.next_action(notice.as_ref())? {
            PromptAction::Code(input) => {
                let code = match validate_otp_input(&input) {
                    Ok(code) => code,
                    Err(message) => {
                        notice = Some(AuthOutcome::failed(message));
                        continue;
                    }
                };

                let outcome = session.verify_otp(code).await;
                if outcome.success || !matches!(session.state(), AuthState::AwaitingOtp(_)) {
                    return Ok(outcome);
                }
                notice = Some(outcome);
            }
            PromptAction::Resend => {
                notice = Some(session.resend_otp().await);
            }
            PromptAction::Cancel => {
                debug!("OTP entry cancelled");
                return Ok(AuthOutcome::failed(VERIFICATION_CANCELLED));
            }
        }
    }
}
