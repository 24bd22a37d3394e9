use anyhow::Result;
use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use super::{OtpDispatch, OtpProvider};
use crate::common::mask_phone_number;

/// Stand-in for a delivery service: nothing is sent and every well-formed
/// code is accepted.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockOtpProvider;

impl MockOtpProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OtpProvider for MockOtpProvider {
    async fn send_otp(&self, phone_number: &str) -> Result<OtpDispatch> {
        let session_token = format!("mock-{}", Uuid::new_v4());
        info!(
            phone = %mask_phone_number(phone_number),
            "mock OTP provider: skipping delivery"
        );
        Ok(OtpDispatch { session_token })
    }

    async fn verify_otp(
        &self,
        _phone_number: &str,
        _session_token: &str,
        _code: &str,
    ) -> Result<bool> {
        Ok(true)
    }
}
