//! Error types.

use thiserror::Error;

/// Errors returned by the averaging entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AverageError {
    /// The input slice had no elements, so the mean is undefined.
    #[error("cannot compute the average of an empty sequence")]
    EmptyInput,
}

/// Result alias for averaging operations.
pub type Result<T> = std::result::Result<T, AverageError>;
