//! Error types

use thiserror::Error;

/// Errors raised while fetching tree data.
#[derive(Debug, Error)]
pub enum DataError {
    /// The request was cancelled before it completed.
    #[error("request cancelled")]
    Cancelled,

    /// A JSON document could not be parsed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A data file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for data operations.
pub type Result<T, E = DataError> = std::result::Result<T, E>;
