use crate::error::Result;
use crate::mapping::Mapping;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// A read-only view of a storage engine.
///
/// Every method reports a missing row as `Ok(None)` and reserves `Err` for
/// failures of the engine itself.
#[async_trait]
pub trait ReadBackend: Send + Sync + 'static {
    /// Retrieves the mapping stored under `code`.
    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<Mapping>>;

    /// Returns the largest identifier persisted so far, or `None` when the
    /// store is empty.
    async fn max_id(&self) -> Result<Option<u64>>;
}

#[async_trait]
pub trait Backend: ReadBackend {
    /// Inserts a mapping whose identifier was allocated by the caller.
    ///
    /// Returns `Err(Conflict)` if the identifier or the code is already taken.
    async fn insert(&self, mapping: &Mapping) -> Result<()>;

    /// Inserts a URL under an identifier allocated by the engine itself.
    ///
    /// The identifier comes from the engine's atomic key generation and the
    /// derived code is written in the same transaction, so the returned
    /// mapping is durable once this resolves.
    async fn insert_generated(&self, url: &str) -> Result<Mapping>;
}
