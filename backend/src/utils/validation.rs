use regex::Regex;
use std::sync::OnceLock;
use validator::ValidationError;

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_.-]+$").unwrap())
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?[0-9][0-9 \-]{5,19}$").unwrap())
}

/// Validate username format
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.len() < 3 {
        return Err(ValidationError::new("username_too_short"));
    }
    if username.len() > 50 {
        return Err(ValidationError::new("username_too_long"));
    }
    if !username_regex().is_match(username) {
        return Err(ValidationError::new("invalid_username_format"));
    }
    Ok(())
}

/// Validate phone number format
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if !phone_regex().is_match(phone) {
        return Err(ValidationError::new("invalid_phone_format"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_usernames() {
        assert!(validate_username("admin").is_ok());
        assert!(validate_username("staff.user-2").is_ok());
    }

    #[test]
    fn rejects_short_and_malformed_usernames() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(51)).is_err());
    }

    #[test]
    fn accepts_international_phone_numbers() {
        assert!(validate_phone("+8801234567890").is_ok());
        assert!(validate_phone("01712-345678").is_ok());
    }

    #[test]
    fn rejects_malformed_phone_numbers() {
        assert!(validate_phone("phone").is_err());
        assert!(validate_phone("+12").is_err());
    }
}
