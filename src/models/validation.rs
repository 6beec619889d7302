//! Field rules applied at the request boundary.
//!
//! Everything here is pure: the services only ever receive values that
//! already passed these checks and were normalised.

use std::borrow::Cow;

use validator::ValidationError;

/// Minimum number of digits a phone number must keep after normalisation
pub const MIN_PHONE_DIGITS: usize = 7;

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::Borrowed("must not be blank"));
        return Err(err);
    }
    Ok(())
}

pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if normalize_phone(value).len() < MIN_PHONE_DIGITS {
        let mut err = ValidationError::new("phone");
        err.message = Some(Cow::Borrowed("must contain at least 7 digits"));
        return Err(err);
    }
    Ok(())
}

/// Strip everything but ASCII digits
pub fn normalize_phone(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Empty or whitespace-only optional strings are treated as absent
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_is_reduced_to_digits() {
        assert_eq!(normalize_phone("+1 (555) 010-9999"), "15550109999");
        assert_eq!(normalize_phone("abc"), "");
    }

    #[test]
    fn short_phone_is_rejected() {
        assert!(validate_phone("555-01-2").is_err());
        assert!(validate_phone("555-0123").is_ok());
    }

    #[test]
    fn blank_strings_are_rejected_or_dropped() {
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank(" x ").is_ok());
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" Tolkien ".into())), Some("Tolkien".into()));
        assert_eq!(non_blank(None), None);
    }
}
