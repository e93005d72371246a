//! # Blob Error Types

use thiserror::Error;

/// Blob storage errors.
#[derive(Debug, Error)]
pub enum BlobError {
    /// The connection string could not be parsed or lacks credentials.
    #[error("Invalid blob connection string: {0}")]
    InvalidConnectionString(String),

    /// The account key is not valid base64.
    #[error("Invalid account key")]
    InvalidAccountKey,

    /// The request never got a response (DNS, TLS, connection reset).
    #[error("Blob request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("Blob upload failed with status {status}: {body}")]
    UploadFailed { status: u16, body: String },

    #[error("Internal blob store error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for BlobError {
    fn from(err: reqwest::Error) -> Self {
        BlobError::Request(err.to_string())
    }
}

/// Result type for blob operations.
pub type BlobResult<T> = Result<T, BlobError>;
