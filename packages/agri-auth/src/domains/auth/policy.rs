use chrono::Duration;

/// Codes are exactly this many ASCII digits.
pub const OTP_CODE_LENGTH: usize = 4;

/// Limits applied to pending verifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpPolicy {
    /// Minimum gap between two sends for the same pending session.
    pub resend_cooldown: Duration,
    /// Lifetime of a sent code. `None` means codes never expire.
    pub ttl: Option<Duration>,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            resend_cooldown: Duration::seconds(30),
            ttl: None,
        }
    }
}

pub fn is_well_formed_code(code: &str) -> bool {
    code.len() == OTP_CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_codes() {
        assert!(is_well_formed_code("1234"));
        assert!(is_well_formed_code("0000"));
    }

    #[test]
    fn test_malformed_codes() {
        assert!(!is_well_formed_code(""));
        assert!(!is_well_formed_code("12"));
        assert!(!is_well_formed_code("12345"));
        assert!(!is_well_formed_code("12a4"));
        assert!(!is_well_formed_code(" 123"));
        // Non-ASCII digits are not accepted
        assert!(!is_well_formed_code("१२३४"));
    }
}
