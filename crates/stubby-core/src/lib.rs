//! Core types and traits for the Stubby URL shortener.
//!
//! This crate provides the base-62 code codec, the persisted [`Mapping`]
//! entity and the storage contract implemented by every engine in
//! `stubby-storage`.

pub mod backend;
pub mod codec;
pub mod error;
pub mod mapping;
pub mod shortcode;

pub use backend::{Backend, ReadBackend};
pub use codec::{decode, encode, MAX_ID};
pub use error::{CodecError, StorageError};
pub use mapping::Mapping;
pub use shortcode::ShortCode;
