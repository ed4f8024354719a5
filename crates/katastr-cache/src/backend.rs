use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheError;

/// Key/value store with per-entry TTL.
///
/// Values are opaque bytes. A miss is `Ok(None)`, never an error.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn ping(&self) -> Result<(), CacheError>;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError>;

    /// `false` only for the no-op backend used when caching is off.
    fn is_enabled(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str;
}
