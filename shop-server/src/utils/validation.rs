//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use crate::utils::AppError;
use shared::ErrorCode;

// ── Text length limits ──────────────────────────────────────────────

/// Names: customer, menu item, category, shop
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions, opening hours
pub const MAX_NOTE_LEN: usize = 500;

/// Phone numbers, usernames
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Upper bound for a single drink price
pub const MAX_PRICE: f64 = 100_000.0;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required(field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Paid price bound shared by request validation and the ledger
pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0 && price <= MAX_PRICE
}

/// Validate a paid price: finite, strictly positive, bounded
pub fn validate_price(price: f64, field: &str) -> Result<(), AppError> {
    if !is_valid_price(price) {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{field} must be a positive amount, got {price}"),
        )
        .with_detail("field", field));
    }
    Ok(())
}
