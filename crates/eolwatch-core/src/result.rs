//! Convenience result type alias for eolwatch.

use crate::error::AppError;

/// A specialized `Result` type for eolwatch operations.
pub type AppResult<T> = Result<T, AppError>;
