//! Service categories and payment methods.
//!
//! Both are stored as upper-case text and constrained by check constraints
//! in the initial migration.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Service categories
// ---------------------------------------------------------------------------

pub const CATEGORY_HAIR: &str = "HAIR";
pub const CATEGORY_NAIL: &str = "NAIL";
pub const CATEGORY_SKIN: &str = "SKIN";
pub const CATEGORY_SPA: &str = "SPA";
pub const CATEGORY_MAKEUP: &str = "MAKEUP";
pub const CATEGORY_OTHER: &str = "OTHER";

pub const SERVICE_CATEGORIES: &[&str] = &[
    CATEGORY_HAIR,
    CATEGORY_NAIL,
    CATEGORY_SKIN,
    CATEGORY_SPA,
    CATEGORY_MAKEUP,
    CATEGORY_OTHER,
];

// ---------------------------------------------------------------------------
// Payment methods
// ---------------------------------------------------------------------------

pub const PAYMENT_CASH: &str = "CASH";
pub const PAYMENT_CARD: &str = "CARD";
pub const PAYMENT_TRANSFER: &str = "TRANSFER";
pub const PAYMENT_QR: &str = "QR";

pub const PAYMENT_METHODS: &[&str] = &[PAYMENT_CASH, PAYMENT_CARD, PAYMENT_TRANSFER, PAYMENT_QR];

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Upper-case and validate a service category.
pub fn normalize_category(value: &str) -> Result<String, CoreError> {
    normalize_member(value, SERVICE_CATEGORIES, "category")
}

/// Upper-case and validate a payment method.
pub fn normalize_payment_method(value: &str) -> Result<String, CoreError> {
    normalize_member(value, PAYMENT_METHODS, "payment_method")
}

fn normalize_member(value: &str, allowed: &[&str], field: &str) -> Result<String, CoreError> {
    let upper = value.trim().to_ascii_uppercase();
    if allowed.contains(&upper.as_str()) {
        Ok(upper)
    } else {
        Err(CoreError::Validation(format!(
            "{field} must be one of {}, got '{value}'",
            allowed.join(", ")
        )))
    }
}
