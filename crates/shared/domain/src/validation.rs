//! Custom field validators used by the DTO `validator` derives.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

use crate::constants::{is_valid_user_type, MAX_USERNAME_LENGTH, MIN_USERNAME_LENGTH};

static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug pattern is valid"));

static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("username pattern is valid"));

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Tenant slugs are lowercase words joined by single hyphens.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if SLUG_PATTERN.is_match(slug) {
        Ok(())
    } else {
        Err(invalid(
            "slug",
            "Slug must contain lowercase letters, digits and single hyphens",
        ))
    }
}

/// Usernames are 3 to 50 characters of letters, digits, `_`, `.` or `-`.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len) {
        return Err(invalid(
            "username_length",
            "Username must be between 3 and 50 characters",
        ));
    }
    if !USERNAME_PATTERN.is_match(username) {
        return Err(invalid(
            "username_charset",
            "Username may only contain letters, digits, '_', '.' and '-'",
        ));
    }
    Ok(())
}

pub fn validate_user_type(user_type: &str) -> Result<(), ValidationError> {
    if is_valid_user_type(user_type) {
        Ok(())
    } else {
        Err(invalid("user_type", "Unknown user type"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_accepts_hyphenated_words() {
        assert!(validate_slug("acme").is_ok());
        assert!(validate_slug("acme-eu-2").is_ok());
    }

    #[test]
    fn test_slug_rejects_bad_shapes() {
        assert!(validate_slug("Acme").is_err());
        assert!(validate_slug("-acme").is_err());
        assert!(validate_slug("acme--eu").is_err());
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn test_username_bounds() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("abc").is_ok());
        assert!(validate_username(&"a".repeat(50)).is_ok());
        assert!(validate_username(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_username_charset() {
        assert!(validate_username("jane.doe-01").is_ok());
        assert!(validate_username("jane doe").is_err());
    }

    #[test]
    fn test_user_type() {
        assert!(validate_user_type("admin").is_ok());
        assert!(validate_user_type("root").is_err());
    }
}
