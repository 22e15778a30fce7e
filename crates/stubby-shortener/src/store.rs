use crate::allocator::IdAllocator;
use crate::error::{Result, StoreError};
use crate::settings::{Allocation, StoreSettings};
use crate::shortener::Shortener;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use stubby_core::{Backend, Mapping, ShortCode, StorageError};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Allocates identifiers, persists mappings and serves lookups.
///
/// With [`Allocation::InProcess`] the store owns an [`IdAllocator`] seeded
/// from the backend's largest identifier; with [`Allocation::Backend`] every
/// identifier comes from the engine. Either way an identifier that was
/// reserved for a failed write is skipped, never reused.
pub struct MappingStore<B> {
    backend: Arc<B>,
    allocator: Arc<IdAllocator>,
    settings: StoreSettings,
}

impl<B> Clone for MappingStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            allocator: Arc::clone(&self.allocator),
            settings: self.settings.clone(),
        }
    }
}

impl<B: Backend> MappingStore<B> {
    /// Opens a store over `backend`, recovering the allocator cursor from the
    /// identifiers already persisted there.
    pub async fn initialize(backend: B, settings: StoreSettings) -> Result<Self> {
        Self::initialize_shared(Arc::new(backend), settings).await
    }

    /// Same as [`initialize`](Self::initialize) for a backend that is shared
    /// with other owners.
    pub async fn initialize_shared(backend: Arc<B>, settings: StoreSettings) -> Result<Self> {
        let deadline = settings.operation_timeout.map(|t| Instant::now() + t);
        let max_id = within(deadline, "max_id", backend.max_id())
            .await
            .map_err(|e| {
                warn!(error = %e, "failed to read the largest persisted identifier");
                StoreError::from_read(e)
            })?;

        let allocator = IdAllocator::recover(max_id, settings.id_base.value());
        info!(
            max_id = ?max_id,
            next_id = allocator.peek(),
            allocation = ?settings.allocation,
            "mapping store initialized"
        );

        Ok(Self {
            backend,
            allocator: Arc::new(allocator),
            settings,
        })
    }

    /// Creates a mapping, giving up once `deadline` has passed.
    ///
    /// If the deadline elapses mid-write no code is returned; the reserved
    /// identifier is consumed whether or not the write landed.
    pub async fn create_before(&self, url: &str, deadline: Instant) -> Result<ShortCode> {
        self.create_within(url, Some(deadline)).await
    }

    /// Resolves a code, giving up once `deadline` has passed.
    pub async fn resolve_before(&self, code: &str, deadline: Instant) -> Result<String> {
        self.resolve_within(code, Some(deadline)).await
    }

    /// The identifier the in-process allocator would hand out next, or `None`
    /// when identifiers come from the backend.
    pub fn next_id(&self) -> Option<u64> {
        match self.settings.allocation {
            Allocation::InProcess => Some(self.allocator.peek()),
            Allocation::Backend => None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    fn default_deadline(&self) -> Option<Instant> {
        self.settings
            .operation_timeout
            .map(|timeout| Instant::now() + timeout)
    }

    async fn create_within(&self, url: &str, deadline: Option<Instant>) -> Result<ShortCode> {
        let mapping = match self.settings.allocation {
            Allocation::InProcess => {
                let id = self.allocator.reserve().ok_or_else(|| {
                    StoreError::StorageWrite("identifier space exhausted".to_string())
                })?;
                let mapping = Mapping::new(id, url);
                debug!(id, code = %mapping.code, "reserved identifier");

                within(deadline, "insert", self.backend.insert(&mapping))
                    .await
                    .map_err(|e| {
                        warn!(id, error = %e, "failed to persist mapping, identifier skipped");
                        StoreError::from_write(e)
                    })?;
                mapping
            }
            Allocation::Backend => within(deadline, "insert", self.backend.insert_generated(url))
                .await
                .map_err(|e| {
                    warn!(error = %e, "failed to persist mapping");
                    StoreError::from_write(e)
                })?,
        };

        debug!(id = mapping.id, code = %mapping.code, "created mapping");
        Ok(mapping.code)
    }

    async fn resolve_within(&self, code: &str, deadline: Option<Instant>) -> Result<String> {
        let code = ShortCode::parse(code).map_err(|e| {
            debug!(code, error = %e, "rejected malformed short code");
            StoreError::InvalidCode(e)
        })?;

        match within(deadline, "find_by_code", self.backend.find_by_code(&code)).await {
            Ok(Some(mapping)) => Ok(mapping.url),
            Ok(None) => {
                debug!(code = %code, "short code not found");
                Err(StoreError::NotFound(code))
            }
            Err(e) => {
                warn!(code = %code, error = %e, "failed to look up short code");
                Err(StoreError::from_read(e))
            }
        }
    }
}

#[async_trait]
impl<B: Backend> Shortener for MappingStore<B> {
    async fn create(&self, url: &str) -> Result<ShortCode> {
        self.create_within(url, self.default_deadline()).await
    }

    async fn resolve(&self, code: &str) -> Result<String> {
        self.resolve_within(code, self.default_deadline()).await
    }
}

/// Runs a storage call, turning an elapsed deadline into a timeout error.
async fn within<T, F>(
    deadline: Option<Instant>,
    operation: &'static str,
    call: F,
) -> std::result::Result<T, StorageError>
where
    F: Future<Output = std::result::Result<T, StorageError>>,
{
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, call)
            .await
            .unwrap_or_else(|_| Err(StorageError::Timeout(format!("{operation} exceeded deadline")))),
        None => call.await,
    }
}
