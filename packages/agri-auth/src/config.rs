use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::domains::auth::OtpPolicy;

/// Name of the persisted auth snapshot inside the state directory.
pub const AUTH_STORAGE_KEY: &str = "auth-storage";

/// Twilio Verify credentials. Present only when all three variables are set.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub verify_service_sid: String,
    pub timeout: Duration,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub state_dir: PathBuf,
    pub otp_resend_cooldown: chrono::Duration,
    pub otp_ttl: Option<chrono::Duration>,
    pub twilio: Option<TwilioConfig>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let state_dir = lookup("AGRI_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".agri"));

        let otp_resend_cooldown = parse_seconds(
            "AGRI_OTP_RESEND_SECS",
            &lookup("AGRI_OTP_RESEND_SECS").unwrap_or_else(|| "30".to_string()),
        )?;

        let otp_ttl = lookup("AGRI_OTP_TTL_SECS")
            .map(|raw| parse_seconds("AGRI_OTP_TTL_SECS", &raw))
            .transpose()?;

        let twilio = match (
            lookup("TWILIO_ACCOUNT_SID"),
            lookup("TWILIO_AUTH_TOKEN"),
            lookup("TWILIO_VERIFY_SERVICE_SID"),
        ) {
            (Some(account_sid), Some(auth_token), Some(verify_service_sid)) => {
                let timeout = Duration::from_secs(
                    lookup("TWILIO_TIMEOUT_SECS")
                        .unwrap_or_else(|| "10".to_string())
                        .parse()
                        .context("TWILIO_TIMEOUT_SECS must be a number of seconds")?,
                );
                Some(TwilioConfig {
                    account_sid,
                    auth_token,
                    verify_service_sid,
                    timeout,
                })
            }
            _ => None,
        };

        Ok(Self {
            state_dir,
            otp_resend_cooldown,
            otp_ttl,
            twilio,
        })
    }

    pub fn otp_policy(&self) -> OtpPolicy {
        OtpPolicy {
            resend_cooldown: self.otp_resend_cooldown,
            ttl: self.otp_ttl,
        }
    }
}

/// Parse a whole number of seconds into a chrono duration, rejecting values
/// chrono cannot represent.
fn parse_seconds(key: &str, raw: &str) -> Result<chrono::Duration> {
    let secs: u64 = raw
        .parse()
        .with_context(|| format!("{key} must be a number of seconds"))?;
    chrono::Duration::from_std(Duration::from_secs(secs))
        .with_context(|| format!("{key} is out of range"))
}
