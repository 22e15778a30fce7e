use stubby_core::{CodecError, ShortCode, StorageError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by the mapping store to its callers.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The code is well formed but nothing is stored under it.
    #[error("no mapping for short code: {0}")]
    NotFound(ShortCode),
    /// The code contains characters outside the code alphabet.
    #[error("invalid short code: {0}")]
    InvalidCode(#[from] CodecError),
    /// The backing store could not be reached or did not answer in time.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    /// The backing store rejected a write.
    #[error("storage write rejected: {0}")]
    StorageWrite(String),
}

impl StoreError {
    /// True for both a miss and a malformed code. Callers that answer both
    /// the same way (e.g. with a 404) can branch on this alone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_) | StoreError::InvalidCode(_))
    }

    /// True when repeating the call later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::StorageUnavailable(_))
    }

    /// Classifies a storage failure that happened while reading.
    pub(crate) fn from_read(err: StorageError) -> Self {
        StoreError::StorageUnavailable(err.to_string())
    }

    /// Classifies a storage failure that happened while writing.
    pub(crate) fn from_write(err: StorageError) -> Self {
        if err.is_unavailable() {
            StoreError::StorageUnavailable(err.to_string())
        } else {
            StoreError::StorageWrite(err.to_string())
        }
    }
}
