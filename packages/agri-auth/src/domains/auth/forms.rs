//! Input checks the login screens run before calling the session manager.
//!
//! The manager itself accepts any phone number; these mirror what the forms
//! enforce so every front end rejects the same input with the same wording.

use super::OTP_CODE_LENGTH;

/// Shortest phone number the login form accepts.
pub const MIN_PHONE_LENGTH: usize = 10;

pub fn validate_phone(input: &str) -> Result<&str, String> {
    let phone = input.trim();
    if phone.is_empty() || phone.chars().count() < MIN_PHONE_LENGTH {
        return Err("Please enter a valid phone number".to_string());
    }
    Ok(phone)
}

pub fn validate_otp_input(input: &str) -> Result<&str, String> {
    let code = input.trim();
    if code.chars().count() != OTP_CODE_LENGTH {
        return Err(format!(
            "Please enter the complete {}-digit OTP",
            OTP_CODE_LENGTH
        ));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_length() {
        assert_eq!(validate_phone("9876543210"), Ok("9876543210"));
        assert_eq!(validate_phone(" +919876543210 "), Ok("+919876543210"));
        assert!(validate_phone("").is_err());
        assert!(validate_phone("98765").is_err());
    }

    #[test]
    fn test_otp_length_only() {
        assert_eq!(validate_otp_input("1234"), Ok("1234"));
        assert_eq!(
            validate_otp_input("12"),
            Err("Please enter the complete 4-digit OTP".to_string())
        );
        // Digit checks are left to the session manager
        assert_eq!(validate_otp_input("12ab"), Ok("12ab"));
    }
}
