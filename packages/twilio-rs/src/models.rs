use serde::{Deserialize, Serialize};

/// Response from `POST /Services/{sid}/Verifications`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OTPResponse {
    /// Verification SID (`VE...`). Used as the pending session token.
    pub sid: String,
    pub to: String,
    pub channel: String,
    pub status: String,
}

/// Response from `POST /Services/{sid}/VerificationCheck`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OTPVerifyResponse {
    pub sid: Option<String>,
    pub to: Option<String>,
    pub status: String,
    #[serde(default)]
    pub valid: bool,
}

impl OTPVerifyResponse {
    pub fn is_approved(&self) -> bool {
        self.status == "approved"
    }
}
