// AuthDeps - everything the session manager needs from the outside world
//
// Built once at startup from Config, or assembled by hand in tests.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use twilio::{TwilioOptions, TwilioService};

use super::{
    Clock, FileSnapshotStore, FileUserRepository, MockOtpProvider, OtpDispatch, OtpProvider,
    SnapshotStore, SystemClock, UserRepository,
};
use crate::config::{Config, AUTH_STORAGE_KEY};

// =============================================================================
// Twilio adapter
// =============================================================================

/// Wrapper to implement OtpProvider for TwilioService
pub struct TwilioAdapter(pub Arc<TwilioService>);

impl TwilioAdapter {
    pub fn new(service: Arc<TwilioService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl OtpProvider for TwilioAdapter {
    async fn send_otp(&self, phone_number: &str) -> Result<OtpDispatch> {
        let sent = self.0.send_otp(phone_number).await?;
        Ok(OtpDispatch {
            session_token: sent.sid,
        })
    }

    // Twilio tracks the verification by recipient, so the token is not sent back.
    async fn verify_otp(
        &self,
        phone_number: &str,
        _session_token: &str,
        code: &str,
    ) -> Result<bool> {
        Ok(self.0.verify_otp(phone_number, code).await?)
    }
}

// =============================================================================
// AuthDeps
// =============================================================================

/// Session manager dependencies (using traits for testability)
#[derive(Clone)]
pub struct AuthDeps {
    pub otp: Arc<dyn OtpProvider>,
    pub users: Arc<dyn UserRepository>,
    pub store: Arc<dyn SnapshotStore>,
    pub clock: Arc<dyn Clock>,
}

impl AuthDeps {
    pub fn new(
        otp: Arc<dyn OtpProvider>,
        users: Arc<dyn UserRepository>,
        store: Arc<dyn SnapshotStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            otp,
            users,
            store,
            clock,
        }
    }

    /// Production wiring: users and snapshot under the state directory, Twilio
    /// when configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let otp: Arc<dyn OtpProvider> = match &config.twilio {
            Some(twilio) => {
                let options = TwilioOptions::new(
                    twilio.account_sid.clone(),
                    twilio.auth_token.clone(),
                    twilio.verify_service_sid.clone(),
                )
                .with_timeout(twilio.timeout);
                let service =
                    TwilioService::new(options).context("Failed to build Twilio client")?;
                info!("OTP delivery via Twilio Verify");
                Arc::new(TwilioAdapter::new(Arc::new(service)))
            }
            None => {
                info!("Twilio not configured, using mock OTP provider");
                Arc::new(MockOtpProvider::new())
            }
        };

        Ok(Self::new(
            otp,
            Arc::new(FileUserRepository::new(&config.state_dir)),
            Arc::new(FileSnapshotStore::new(&config.state_dir, AUTH_STORAGE_KEY)),
            Arc::new(SystemClock),
        ))
    }
}
