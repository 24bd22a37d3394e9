// Minimal client for the Twilio Verify v2 API (send + check a one-time code).

use std::collections::HashMap;
use std::time::Duration;

pub mod models;
use reqwest::{header, Client, StatusCode};
use thiserror::Error;
use tracing::{debug, error};

pub use crate::models::{OTPResponse, OTPVerifyResponse};

const DEFAULT_BASE_URL: &str = "https://verify.twilio.com/v2";

#[derive(Debug, Error)]
pub enum TwilioError {
    #[error("request to Twilio failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Twilio returned {status}: {body}")]
    Api { status: StatusCode, body: String },
}

#[derive(Debug, Clone)]
pub struct TwilioOptions {
    pub account_sid: String,
    pub auth_token: String,
    pub service_id: String,
    /// Per-request timeout. `None` uses reqwest's default (no timeout).
    pub timeout: Option<Duration>,
    /// Override for the Verify API root, e.g. a local stub in tests.
    pub base_url: Option<String>,
}

impl TwilioOptions {
    pub fn new(account_sid: String, auth_token: String, service_id: String) -> Self {
        Self {
            account_sid,
            auth_token,
            service_id,
            timeout: None,
            base_url: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone)]
pub struct TwilioService {
    options: TwilioOptions,
    client: Client,
}

impl TwilioService {
    pub fn new(options: TwilioOptions) -> Result<Self, TwilioError> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { options, client })
    }

    fn service_url(&self, path: &str) -> String {
        let base = self
            .options
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');
        format!(
            "{base}/Services/{serv_id}/{path}",
            serv_id = self.options.service_id
        )
    }

    /// Start a verification. The returned `sid` identifies the pending check.
    pub async fn send_otp(&self, recipient: &str) -> Result<OTPResponse, TwilioError> {
        let mut form_body: HashMap<&str, &str> = HashMap::new();
        form_body.insert("To", recipient);
        form_body.insert("Channel", channel_for(recipient));

        let response = self
            .client
            .post(self.service_url("Verifications"))
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&form_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, "Twilio rejected verification request");
            return Err(TwilioError::Api { status, body });
        }

        let sent = response.json::<OTPResponse>().await?;
        debug!(sid = %sent.sid, status = %sent.status, "verification started");
        Ok(sent)
    }

    /// Check a code. `Ok(false)` means Twilio answered but did not approve it;
    /// that includes 404, which Twilio returns once a verification has expired
    /// or was already consumed.
    pub async fn verify_otp(&self, recipient: &str, code: &str) -> Result<bool, TwilioError> {
        let mut form_body: HashMap<&str, &str> = HashMap::new();
        form_body.insert("To", recipient);
        form_body.insert("Code", code);

        let response = self
            .client
            .post(self.service_url("VerificationCheck"))
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&form_body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, "Twilio rejected verification check");
            return Err(TwilioError::Api { status, body });
        }

        let checked = response.json::<OTPVerifyResponse>().await?;
        Ok(checked.is_approved())
    }
}

/// Recipients with an `@` are emails, everything else gets an SMS.
pub fn channel_for(recipient: &str) -> &'static str {
    if recipient.contains('@') {
        "email"
    } else {
        "sms"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(base_url: Option<&str>) -> TwilioService {
        let mut options = TwilioOptions::new(
            "test_account_sid".to_string(),
            "test_auth_token".to_string(),
            "VA123".to_string(),
        );
        options.base_url = base_url.map(str::to_string);
        TwilioService::new(options).unwrap()
    }

    #[test]
    fn test_channel_detection() {
        assert_eq!(channel_for("+919876543210"), "sms");
        assert_eq!(channel_for("farmer@example.com"), "email");
    }

    #[test]
    fn test_service_url_default() {
        let svc = service(None);
        assert_eq!(
            svc.service_url("Verifications"),
            "https://verify.twilio.com/v2/Services/VA123/Verifications"
        );
    }

    #[test]
    fn test_service_url_override_trims_slash() {
        let svc = service(Some("http://localhost:9999/v2/"));
        assert_eq!(
            svc.service_url("VerificationCheck"),
            "http://localhost:9999/v2/Services/VA123/VerificationCheck"
        );
    }

    #[test]
    fn test_verify_response_approval() {
        let approved: OTPVerifyResponse =
            serde_json::from_str(r#"{"status":"approved","valid":true}"#).unwrap();
        assert!(approved.is_approved());

        let pending: OTPVerifyResponse =
            serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert!(!pending.is_approved());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        let svc = service(Some("http://127.0.0.1:1"));
        let err = svc.send_otp("+919876543210").await.unwrap_err();
        assert!(matches!(err, TwilioError::Request(_)));
    }
}
