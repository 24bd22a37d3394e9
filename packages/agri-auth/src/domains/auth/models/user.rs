use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user whose phone number has been confirmed with an OTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub phone: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
