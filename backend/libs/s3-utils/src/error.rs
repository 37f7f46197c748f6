//! Error types for object store operations

use thiserror::Error;

/// Result type for object store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by an [`ObjectStore`](crate::ObjectStore)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Bucket or key does not exist
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Credentials lack permission for the operation
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Service unreachable, throttled or returned a 5xx
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Response body could not be read
    #[error("Failed to read object body: {0}")]
    Body(String),

    #[error("Store error: {0}")]
    Other(String),
}

impl StoreError {
    /// Check if error is transient (redelivery may succeed)
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Body(_))
    }

    /// Classify an HTTP status returned by the store
    pub fn from_status(status: Option<u16>, message: String) -> Self {
        match status {
            Some(404) => StoreError::NotFound(message),
            Some(401) | Some(403) => StoreError::AccessDenied(message),
            Some(429) => StoreError::Unavailable(message),
            Some(code) if code >= 500 => StoreError::Unavailable(message),
            // No HTTP response at all: dispatch failure or timeout
            None => StoreError::Unavailable(message),
            Some(_) => StoreError::Other(message),
        }
    }
}
