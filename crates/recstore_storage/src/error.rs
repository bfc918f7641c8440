//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The persisted document is not valid JSON, or records failed to serialize.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The persisted document is valid JSON but not a record sequence.
    #[error("storage corrupted: {0}")]
    Corrupted(String),
}
