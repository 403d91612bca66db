//! Input checks shared by the services. Every check runs before any write.

use beredskap_core::error::AppError;
use beredskap_core::result::AppResult;

/// Reject zero and negative quantities.
pub(crate) fn positive_quantity(quantity: i32, field: &str) -> AppResult<()> {
    if quantity <= 0 {
        return Err(AppError::validation(format!(
            "{field} must be greater than zero, got {quantity}"
        )));
    }
    Ok(())
}

/// Trim `value` and reject it when nothing is left.
pub(crate) fn non_blank(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Resolve a caller-supplied page size against the configured maximum.
pub(crate) fn page_limit(requested: Option<u32>, max: u32) -> i64 {
    let max = max.max(1);
    i64::from(requested.unwrap_or(max).clamp(1, max))
}
