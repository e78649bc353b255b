//! Convenience result type alias for StudioFlow.

use crate::error::AppError;

/// A specialized `Result` type for StudioFlow operations.
///
/// Every crate in the workspace returns this so that errors compose with `?`.
pub type AppResult<T> = Result<T, AppError>;
