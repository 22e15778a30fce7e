//! Storage engines implementing the `stubby_core` backend contract.

mod error;
mod sql;
pub mod memory;
pub mod mysql;
pub mod sqlite;

pub use memory::InMemoryBackend;
pub use mysql::MySqlBackend;
pub use sqlite::SqliteBackend;
pub use stubby_core::backend::{Backend, ReadBackend};
pub use stubby_core::error::StorageError;
