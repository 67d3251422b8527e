// Store error types
use crate::filter::FilterError;

/// Errors raised by entity stores
///
/// The store itself never rejects an entity; these cover query parsing,
/// persistence and caller-supplied operations that fail.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Invalid patch for item '{id}': {message}")]
    InvalidPatch { id: String, message: String },

    #[error("Serialization error in store '{store}': {message}")]
    Serialization { store: String, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("{0}")]
    Message(String),
}

impl StoreError {
    pub fn not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound(id.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        StoreError::Storage(message.into())
    }

    pub fn serialization(store: impl Into<String>, message: impl ToString) -> Self {
        StoreError::Serialization { store: store.into(), message: message.to_string() }
    }

    pub fn operation(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        StoreError::OperationFailed(source.into())
    }

    pub fn message(message: impl Into<String>) -> Self {
        StoreError::Message(message.into())
    }

    /// Stable code for CLI/JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::Filter(_) => "FILTER_ERROR",
            StoreError::InvalidLimit(_) => "INVALID_LIMIT",
            StoreError::NotFound(_) => "NOT_FOUND",
            StoreError::InvalidPatch { .. } => "INVALID_PATCH",
            StoreError::Serialization { .. } => "SERIALIZATION_ERROR",
            StoreError::Storage(_) => "STORAGE_ERROR",
            StoreError::Io(_) => "IO_ERROR",
            StoreError::Json(_) => "INVALID_JSON",
            StoreError::OperationFailed(_) => "OPERATION_FAILED",
            StoreError::Message(_) => "ERROR",
        }
    }
}
