//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits are
//! applied at the API boundary.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category, attribute, store, role, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Machine codes: SKUs, attribute codes, value codes, slugs
pub const MAX_CODE_LEN: usize = 100;

/// Notes, descriptions
pub const MAX_NOTE_LEN: usize = 2000;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Translation values can hold full paragraphs
pub const MAX_TRANSLATION_LEN: usize = 10_000;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
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

/// Validate a slug-like code: lowercase alphanumerics, `-` and `_`.
pub fn validate_code(value: &str, field: &str) -> Result<(), AppError> {
    validate_required_text(value, field, MAX_CODE_LEN)?;
    if !value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(AppError::validation(format!(
            "{field} may only contain lowercase letters, digits, '-' and '_'"
        )));
    }
    Ok(())
}
