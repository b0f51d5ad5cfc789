/// Error types for the tab store
use thiserror::Error;

/// Failure reported by the host persistence layer.
///
/// The store never interprets these; they are forwarded to the caller as-is.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("storage backend error: {message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        BackendError {
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("stored tab data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("no tab id left above i64::MAX")]
    IdsExhausted,
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::new("QUOTA_BYTES quota exceeded");
        assert_eq!(err.to_string(), "storage backend error: QUOTA_BYTES quota exceeded");
    }

    #[test]
    fn test_backend_error_passes_through_store_error() {
        let err: StoreError = BackendError::new("disk gone").into();
        assert_eq!(err.to_string(), "storage backend error: disk gone");
        assert!(matches!(err, StoreError::Backend(ref e) if e.message == "disk gone"));
    }
}
