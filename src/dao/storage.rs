use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by archive backends regardless of where the bytes live.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The archive could not be turned into bytes.
    #[error("failed to encode archive")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
    /// Stored bytes do not describe a valid archive.
    #[error("failed to decode archive")]
    Decode {
        #[source]
        source: serde_json::Error,
    },
    /// The logical key cannot be mapped onto the backend.
    #[error("invalid storage key `{key}`")]
    InvalidKey { key: String },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}
