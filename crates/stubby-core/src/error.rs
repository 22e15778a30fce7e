use thiserror::Error;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors produced while parsing or decoding a short code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("short code is empty")]
    Empty,
    #[error("short code is too long: {len} characters, at most {max} allowed")]
    TooLong { len: usize, max: usize },
    #[error("invalid character {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },
    #[error("short code value does not fit in 64 bits")]
    Overflow,
}

/// Errors reported by a storage engine.
///
/// A missing row is never an error: lookups return `Ok(None)` instead, so
/// callers can tell "no such mapping" apart from a broken backend.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("mapping already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Whether the error points at the infrastructure rather than at the
    /// request (connectivity, timeouts).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StorageError::Unavailable(_) | StorageError::Timeout(_))
    }
}
