//! Error types for RecStore core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in RecStore core operations.
///
/// Lookup misses are not errors: queries return `Option`/empty `Vec`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Backing store error (I/O or malformed persisted data).
    #[error("storage error: {0}")]
    Storage(#[from] recstore_storage::StorageError),

    /// A typed value could not be converted to or from a record.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// `update` was called with something other than a JSON object.
    #[error("invalid update: {message}")]
    InvalidUpdate {
        /// Description of the rejected argument.
        message: String,
    },

    /// No model with this name exists in the schema.
    #[error("model not found: {name}")]
    ModelNotFound {
        /// Name that was looked up.
        name: String,
    },
}

impl CoreError {
    /// Creates an invalid update error.
    pub fn invalid_update(message: impl Into<String>) -> Self {
        Self::InvalidUpdate {
            message: message.into(),
        }
    }

    /// Creates a model not found error.
    pub fn model_not_found(name: impl Into<String>) -> Self {
        Self::ModelNotFound { name: name.into() }
    }
}
