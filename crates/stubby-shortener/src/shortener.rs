use crate::error::Result;
use async_trait::async_trait;
use stubby_core::ShortCode;

/// The two operations a transport layer may call.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Stores `url` under a freshly allocated code and returns the code.
    ///
    /// A returned code is always durably recorded.
    async fn create(&self, url: &str) -> Result<ShortCode>;

    /// Returns the URL stored under `code`, exactly as it was submitted.
    async fn resolve(&self, code: &str) -> Result<String>;
}
