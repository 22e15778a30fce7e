//! Identifier allocation and the mapping store.
//!
//! [`MappingStore`] is the entry point for the transport layer: `create`
//! mints a code for a URL, `resolve` looks one up. Storage engines come from
//! `stubby_storage`; core types are re-exported from `stubby_core`.

pub mod allocator;
pub mod error;
pub mod settings;
pub mod shortener;
pub mod store;

pub use allocator::IdAllocator;
pub use error::StoreError;
pub use settings::{Allocation, IdBase, StoreSettings};
pub use shortener::Shortener;
pub use store::MappingStore;
pub use stubby_core::{Mapping, ShortCode};
