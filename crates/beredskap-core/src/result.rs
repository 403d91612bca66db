//! Convenience result type alias for Beredskap.

use crate::error::AppError;

/// A specialized `Result` type for Beredskap operations.
pub type AppResult<T> = Result<T, AppError>;
