//! Field-level validators shared by request DTOs.
//!
//! The functions returning [`ValidationError`] are designed to be plugged into
//! `#[validate(custom(function = "..."))]` attributes so that failures surface
//! as per-field errors in the `400` response body.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length in characters (argon2 input sanity bound).
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Minimum number of digits in a phone number.
const MIN_PHONE_DIGITS: usize = 7;

/// Maximum number of digits in a phone number (E.164).
const MAX_PHONE_DIGITS: usize = 15;

/// Optional leading `+`, then digits separated by spaces, dashes, dots or parentheses.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 ().-]*$").expect("valid regex"));

/// Lowercase kebab-case slug (`rustic-barn`, `beach2025`).
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid regex"));

/// `#rgb` or `#rrggbb`.
static HEX_COLOUR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid regex")
});

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// Validate password strength.
///
/// A password must be at least [`MIN_PASSWORD_LENGTH`] characters and contain
/// an uppercase letter, a lowercase letter, a digit, and a special character.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(error(
            "password_length",
            "Password must be at least 8 characters long",
        ));
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(error(
            "password_length",
            "Password must be at most 128 characters long",
        ));
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err(error(
            "password_uppercase",
            "Password must contain at least one uppercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err(error(
            "password_lowercase",
            "Password must contain at least one lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(error(
            "password_digit",
            "Password must contain at least one digit",
        ));
    }
    if !password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
    {
        return Err(error(
            "password_special",
            "Password must contain at least one special character",
        ));
    }
    Ok(())
}

/// Validate a phone number: optional `+`, 7 to 15 digits, common separators.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let trimmed = phone.trim();
    if !PHONE_RE.is_match(trimmed) {
        return Err(error("phone_format", "Phone number contains invalid characters"));
    }
    let digits = trimmed.chars().filter(char::is_ascii_digit).count();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        return Err(error(
            "phone_length",
            "Phone number must contain between 7 and 15 digits",
        ));
    }
    Ok(())
}

/// Validate a lowercase kebab-case slug.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if !SLUG_RE.is_match(slug) {
        return Err(error(
            "slug_format",
            "Slug must be lowercase letters and digits separated by single dashes",
        ));
    }
    Ok(())
}

/// Validate a CSS hex colour (`#abc` or `#aabbcc`).
pub fn validate_hex_colour(colour: &str) -> Result<(), ValidationError> {
    if !HEX_COLOUR_RE.is_match(colour) {
        return Err(error("hex_colour", "Colour must be a hex value like #aabbcc"));
    }
    Ok(())
}

/// Validate that a text value is not only whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "Value must not be blank"));
    }
    Ok(())
}

/// Validate an optional budget range: both bounds non-negative and `min <= max`.
pub fn validate_budget_range(min: Option<i64>, max: Option<i64>) -> Result<(), CoreError> {
    if let Some(min) = min {
        if min < 0 {
            return Err(CoreError::invalid_field(
                "budget_min",
                "Minimum budget must not be negative",
            ));
        }
    }
    if let Some(max) = max {
        if max < 0 {
            return Err(CoreError::invalid_field(
                "budget_max",
                "Maximum budget must not be negative",
            ));
        }
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(CoreError::invalid_field(
                "budget_max",
                format!("Maximum budget ({max}) must be at least the minimum ({min})"),
            ));
        }
    }
    Ok(())
}

/// `true` when the value is absent, empty, or whitespace only.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(result: Result<(), ValidationError>) -> String {
        result.expect_err("expected a validation error").code.to_string()
    }

    #[test]
    fn strong_password_passes() {
        assert!(validate_password("Blossom#2026").is_ok());
        assert!(validate_password("Aa1!aaaa").is_ok());
    }

    #[test]
    fn password_shorter_than_eight_is_rejected() {
        assert_eq!(code_of(validate_password("Aa1!aaa")), "password_length");
    }

    #[test]
    fn password_without_uppercase_is_rejected() {
        assert_eq!(code_of(validate_password("blossom#2026")), "password_uppercase");
    }

    #[test]
    fn password_without_lowercase_is_rejected() {
        assert_eq!(code_of(validate_password("BLOSSOM#2026")), "password_lowercase");
    }

    #[test]
    fn password_without_digit_is_rejected() {
        assert_eq!(code_of(validate_password("Blossom#Rings")), "password_digit");
    }

    #[test]
    fn password_without_special_is_rejected() {
        assert_eq!(code_of(validate_password("Blossom2026")), "password_special");
    }

    #[test]
    fn password_errors_carry_messages() {
        let err = validate_password("short").unwrap_err();
        assert!(err.message.is_some());
    }

    #[test]
    fn phone_numbers() {
        assert!(validate_phone("+91 98765-43210").is_ok());
        assert!(validate_phone("(555) 123.4567").is_ok());
        assert_eq!(code_of(validate_phone("12345")), "phone_length");
        assert_eq!(code_of(validate_phone("call me")), "phone_format");
        assert_eq!(code_of(validate_phone("+1234567890123456")), "phone_length");
    }

    #[test]
    fn slugs() {
        assert!(validate_slug("rustic-barn").is_ok());
        assert!(validate_slug("beach2025").is_ok());
        assert!(validate_slug("Rustic-Barn").is_err());
        assert!(validate_slug("double--dash").is_err());
        assert!(validate_slug("-leading").is_err());
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some("   ")));
        assert!(!is_blank(Some("x")));
        assert!(validate_not_blank("  ").is_err());
    }

    #[test]
    fn budget_range_rules() {
        assert!(validate_budget_range(Some(1000), Some(5000)).is_ok());
        assert!(validate_budget_range(None, Some(5000)).is_ok());
        assert!(validate_budget_range(Some(5000), Some(5000)).is_ok());
        assert!(validate_budget_range(Some(-1), None).is_err());
        match validate_budget_range(Some(9000), Some(5000)) {
            Err(CoreError::InvalidField { field, .. }) => assert_eq!(field, "budget_max"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn hex_colours() {
        assert!(validate_hex_colour("#fff").is_ok());
        assert!(validate_hex_colour("#F4E1D2").is_ok());
        assert_eq!(code_of(validate_hex_colour("F4E1D2")), "hex_colour");
        assert_eq!(code_of(validate_hex_colour("#f4e1d")), "hex_colour");
    }
}
