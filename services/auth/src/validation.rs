//! Input validation utilities for identity fields

use regex::Regex;
use std::sync::OnceLock;

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Validate display name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }

    if name.chars().count() > 100 {
        return Err("Name must be at most 100 characters long".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX
        .get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("Failed to compile email regex"));

    if !regex.is_match(email) {
        return Err("Please use a valid email address".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ));
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_must_not_be_blank() {
        assert!(validate_name("Alice").is_ok());
        assert_eq!(validate_name("").unwrap_err(), "Name is required");
        assert_eq!(validate_name("   ").unwrap_err(), "Name is required");
    }

    #[test]
    fn email_needs_local_and_domain_parts() {
        assert!(validate_email("alice@x.com").is_ok());
        assert!(validate_email("a.b+tag@mail.example.org").is_ok());

        for bad in ["", "alice", "alice@", "@x.com", "alice@x", "al ice@x.com"] {
            assert!(validate_email(bad).is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn password_has_a_minimum_length() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
        assert_eq!(validate_password("").unwrap_err(), "Password is required");
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn name_and_password_have_upper_bounds() {
        assert!(validate_name(&"n".repeat(100)).is_ok());
        assert_eq!(
            validate_name(&"n".repeat(101)).unwrap_err(),
            "Name must be at most 100 characters long"
        );

        assert!(validate_password(&"p".repeat(128)).is_ok());
        assert_eq!(
            validate_password(&"p".repeat(129)).unwrap_err(),
            "Password must be at most 128 characters long"
        );
    }
}
