use crate::codec;
use crate::shortcode::ShortCode;
use serde::{Deserialize, Serialize};

/// A persisted association between an identifier, its code and a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// Identifier the code is derived from.
    pub id: u64,
    /// Short code, always `encode(id)`.
    pub code: ShortCode,
    /// The URL as submitted.
    pub url: String,
}

impl Mapping {
    /// Builds the mapping for a freshly allocated identifier.
    pub fn new(id: u64, url: impl Into<String>) -> Self {
        Self {
            id,
            code: codec::encode(id),
            url: url.into(),
        }
    }
}
