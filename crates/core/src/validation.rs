//! Field-level validation helpers shared by handlers.
//!
//! Each helper returns a [`CoreError::Validation`] naming the offending
//! field so the HTTP layer can report it as a 400.

use validator::ValidateEmail;

use crate::error::CoreError;
use crate::money::MAX_AMOUNT;

pub const MIN_PIN_LENGTH: usize = 4;
pub const MAX_PIN_LENGTH: usize = 8;
pub const MAX_NAME_LENGTH: usize = 120;
pub const MAX_NOTES_LENGTH: usize = 2000;

/// Reject empty or overlong names. Returns the trimmed value.
pub fn validate_name(value: &str, field: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// PINs are 4 to 8 ASCII digits.
pub fn validate_pin(pin: &str) -> Result<(), CoreError> {
    let len = pin.len();
    if !(MIN_PIN_LENGTH..=MAX_PIN_LENGTH).contains(&len) || !pin.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(CoreError::Validation(format!(
            "pin must be {MIN_PIN_LENGTH} to {MAX_PIN_LENGTH} digits"
        )));
    }
    Ok(())
}

/// Amounts must be finite, non-negative and below [`MAX_AMOUNT`].
pub fn validate_amount(value: f64, field: &str) -> Result<(), CoreError> {
    if !value.is_finite() {
        return Err(CoreError::Validation(format!(
            "{field} must be a finite number"
        )));
    }
    if value < 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    if value > MAX_AMOUNT {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum allowed ({MAX_AMOUNT}), got {value}"
        )));
    }
    Ok(())
}

/// Optional email: blank becomes `None`, anything else must look like an address.
pub fn normalize_email(value: Option<&str>) -> Result<Option<String>, CoreError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(email) if email.validate_email() => Ok(Some(email.to_ascii_lowercase())),
        Some(email) => Err(CoreError::Validation(format!(
            "email '{email}' is not a valid address"
        ))),
    }
}

/// Optional phone: blank becomes `None`; otherwise digits, spaces and `+-()` only.
pub fn normalize_phone(value: Option<&str>) -> Result<Option<String>, CoreError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(phone) => {
            let valid = phone.chars().any(|c| c.is_ascii_digit())
                && phone
                    .chars()
                    .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'));
            if valid {
                Ok(Some(phone.to_string()))
            } else {
                Err(CoreError::Validation(format!(
                    "phone '{phone}' contains invalid characters"
                )))
            }
        }
    }
}

pub fn validate_notes(value: Option<&str>) -> Result<(), CoreError> {
    if value.is_some_and(|n| n.chars().count() > MAX_NOTES_LENGTH) {
        return Err(CoreError::Validation(format!(
            "notes must be at most {MAX_NOTES_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed() {
        assert_eq!(validate_name("  Ana ", "name").unwrap(), "Ana");
        assert!(validate_name("   ", "name").is_err());
        assert!(validate_name(&"x".repeat(MAX_NAME_LENGTH + 1), "name").is_err());
    }

    #[test]
    fn pins_must_be_short_digit_strings() {
        assert!(validate_pin("1234").is_ok());
        assert!(validate_pin("12345678").is_ok());
        assert!(validate_pin("123").is_err());
        assert!(validate_pin("123456789").is_err());
        assert!(validate_pin("12a4").is_err());
    }

    #[test]
    fn amounts_reject_negative_and_non_finite() {
        assert!(validate_amount(0.0, "price").is_ok());
        assert!(validate_amount(-0.01, "price").is_err());
        assert!(validate_amount(f64::NAN, "price").is_err());
        assert!(validate_amount(f64::INFINITY, "price").is_err());
        assert!(validate_amount(MAX_AMOUNT + 1.0, "price").is_err());
    }

    #[test]
    fn email_is_optional_and_lowercased() {
        assert_eq!(normalize_email(None).unwrap(), None);
        assert_eq!(normalize_email(Some("  ")).unwrap(), None);
        assert_eq!(
            normalize_email(Some("Ana@Example.com")).unwrap().as_deref(),
            Some("ana@example.com")
        );
        assert!(normalize_email(Some("not-an-email")).is_err());
    }

    #[test]
    fn phone_allows_common_punctuation() {
        assert_eq!(
            normalize_phone(Some("+1 (555) 010-2030")).unwrap().as_deref(),
            Some("+1 (555) 010-2030")
        );
        assert!(normalize_phone(Some("call me")).is_err());
        assert!(normalize_phone(Some("+-")).is_err());
        assert_eq!(normalize_phone(Some("")).unwrap(), None);
    }

    #[test]
    fn notes_have_a_length_cap() {
        assert!(validate_notes(None).is_ok());
        assert!(validate_notes(Some(&"n".repeat(MAX_NOTES_LENGTH + 1))).is_err());
    }
}
