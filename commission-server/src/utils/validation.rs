//! Input validation helpers
//!
//! Text length limits, percentage and amount checks shared by the
//! commission services.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Titles and names
pub const MAX_NAME_LEN: usize = 200;

/// Notes, rejection reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: property id, transaction id, payment method
pub const MAX_SHORT_TEXT_LEN: usize = 100;

// ── Text ────────────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required(field));
    }
    validate_length(value, field, max_len)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value {
        validate_length(v, field, max_len)?;
    }
    Ok(())
}

fn validate_length(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Require an optional string to be present and non-blank; returns it trimmed.
pub fn require_text<'a>(
    value: &'a Option<String>,
    field: &str,
    max_len: usize,
) -> Result<&'a str, AppError> {
    let v = value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::required(field))?;
    validate_required_text(v, field, max_len)?;
    Ok(v)
}

// ── Numbers ─────────────────────────────────────────────────────────

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
pub fn require_finite(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number, got {value}"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate a percentage is finite and within [0, 100]
pub fn validate_percentage(value: f64, field: &str) -> Result<(), AppError> {
    require_finite(value, field)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(AppError::out_of_range(
            field,
            format!("{field} must be between 0 and 100, got {value}"),
        ));
    }
    Ok(())
}

/// Validate an amount is finite and non-negative
pub fn validate_non_negative(value: f64, field: &str) -> Result<(), AppError> {
    require_finite(value, field)?;
    if value < 0.0 {
        return Err(AppError::out_of_range(
            field,
            format!("{field} must be non-negative, got {value}"),
        ));
    }
    Ok(())
}

/// Validate an amount is finite and strictly positive
pub fn validate_positive(value: f64, field: &str) -> Result<(), AppError> {
    require_finite(value, field)?;
    if value <= 0.0 {
        return Err(AppError::out_of_range(
            field,
            format!("{field} must be greater than 0, got {value}"),
        ));
    }
    Ok(())
}
