use thiserror::Error;

use crate::BlobId;

/// Result type for blob operations
pub type BlobResult<T> = Result<T, BlobError>;

/// Errors that can occur during blob operations
#[derive(Error, Debug)]
pub enum BlobError {
    #[error("Blob not found: {id}")]
    NotFound { id: BlobId },

    #[error("Blob {id} exceeds maximum size of {max_bytes} bytes")]
    TooLarge { id: BlobId, max_bytes: u64 },

    #[error("Invalid request: {message}")]
    Invalid { message: String },

    #[error("Upload stream for blob {id} failed: {source}")]
    Stream {
        id: BlobId,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl BlobError {
    /// Create a not found error
    pub fn not_found(id: BlobId) -> Self {
        Self::NotFound { id }
    }

    /// Create a size limit error
    pub fn too_large(id: BlobId, max_bytes: u64) -> Self {
        Self::TooLarge { id, max_bytes }
    }

    /// Create an invalid request error
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// The caller's input stream broke off before it was fully consumed
    pub fn stream(id: BlobId, source: std::io::Error) -> Self {
        Self::Stream { id, source }
    }
}
