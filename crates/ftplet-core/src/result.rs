//! Convenience result type alias for ftplet.

use crate::error::AppError;

/// A specialized `Result` type for ftplet operations.
pub type AppResult<T> = Result<T, AppError>;
