//! Convenience result type alias for DocSpace.

use crate::error::AppError;

/// A specialized `Result` type for DocSpace operations.
pub type AppResult<T> = Result<T, AppError>;
