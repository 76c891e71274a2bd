use models::ValidationError;
use thiserror::Error;

use crate::storage::StorageError;
use crate::uploads::{StreamError, UploadError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("file error: {0}")]
    FileIo(String),
    /// The incoming image stream failed; the source is the transport's own error.
    #[error("failed to read uploaded image: {0}")]
    UploadRead(#[source] StreamError),
}

impl From<UploadError> for ServiceError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::Io { .. } => Self::FileIo(e.to_string()),
            UploadError::Read(source) => Self::UploadRead(source),
        }
    }
}
