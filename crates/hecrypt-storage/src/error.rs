//! Storage error types

use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Storage not configured: {0}")]
    NotConfigured(String),
}

impl StorageError {
    /// Transient failures worth another attempt. Auth, conflict, malformed
    /// request and path errors will fail the same way every time.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StorageError::RateLimited(_) | StorageError::Backend(_) | StorageError::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(StorageError::Backend("503".into()).is_retryable());
        assert!(StorageError::RateLimited("429".into()).is_retryable());
        assert!(StorageError::Io(std::io::Error::other("reset")).is_retryable());

        assert!(!StorageError::Unauthorized("bad token".into()).is_retryable());
        assert!(!StorageError::Conflict("path".into()).is_retryable());
        assert!(!StorageError::BadRequest("HTTP 400".into()).is_retryable());
        assert!(!StorageError::NotFound("x".into()).is_retryable());
        assert!(!StorageError::InvalidPath("".into()).is_retryable());
    }
}
