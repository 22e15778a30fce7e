use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use stubby_core::error::{Result, StorageError};
use stubby_core::{Backend, Mapping, ReadBackend, ShortCode};

/// In-memory implementation of the backend contract using DashMap.
///
/// Mappings are indexed both by code (for lookups) and by identifier (to
/// reject duplicate identifiers). `high_water` holds the largest identifier
/// ever taken plus one, or zero while the store is empty.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    by_code: DashMap<ShortCode, Mapping>,
    by_id: DashMap<u64, ShortCode>,
    high_water: AtomicU64,
}

impl InMemoryBackend {
    /// Creates a new, empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    fn put(&self, mapping: &Mapping) -> Result<()> {
        match self.by_id.entry(mapping.id) {
            Entry::Occupied(_) => {
                return Err(StorageError::Conflict(format!("identifier {}", mapping.id)));
            }
            Entry::Vacant(slot) => {
                slot.insert(mapping.code.clone());
            }
        }

        match self.by_code.entry(mapping.code.clone()) {
            Entry::Occupied(_) => {
                // Release the identifier claimed above.
                self.by_id.remove(&mapping.id);
                return Err(StorageError::Conflict(mapping.code.to_string()));
            }
            Entry::Vacant(slot) => {
                slot.insert(mapping.clone());
            }
        }

        self.high_water
            .fetch_max(mapping.id.saturating_add(1), Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl ReadBackend for InMemoryBackend {
    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<Mapping>> {
        Ok(self.by_code.get(code).map(|entry| entry.value().clone()))
    }

    async fn max_id(&self) -> Result<Option<u64>> {
        Ok(self.high_water.load(Ordering::SeqCst).checked_sub(1))
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn insert(&self, mapping: &Mapping) -> Result<()> {
        self.put(mapping)
    }

    async fn insert_generated(&self, url: &str) -> Result<Mapping> {
        loop {
            // Keys start at 1, like SQL auto-increment columns.
            let id = self
                .high_water
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |hw| {
                    hw.max(1).checked_add(1)
                })
                .map(|previous| previous.max(1))
                .map_err(|_| StorageError::Operation("identifier space exhausted".to_string()))?;

            let mapping = Mapping::new(id, url);
            match self.put(&mapping) {
                // A caller-supplied insert claimed this key first.
                Err(StorageError::Conflict(_)) => continue,
                Err(err) => return Err(err),
                Ok(()) => return Ok(mapping),
            }
        }
    }
}
