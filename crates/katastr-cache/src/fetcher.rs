//! Cache-aside executor.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::backend::CacheBackend;
use crate::error::ResolveError;

/// Serves cached bytes when present, otherwise runs a fetch and stores its
/// serialized result.
///
/// Cache failures never fail a request: they are logged and the call falls
/// through to the fetch. Concurrent misses on one key each fetch.
#[derive(Clone)]
pub struct CachedFetcher {
    backend: Arc<dyn CacheBackend>,
}

impl std::fmt::Debug for CachedFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedFetcher")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl CachedFetcher {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn CacheBackend> {
        &self.backend
    }

    /// Returns the JSON bytes for `key`, fetching and caching them for `ttl`
    /// on a miss.
    ///
    /// A hit returns the stored bytes verbatim. A fetch error is returned as
    /// [`ResolveError::Fetch`] and nothing is cached.
    pub async fn resolve<T, E, F, Fut>(
        &self,
        cancel: &CancellationToken,
        key: &str,
        ttl: Duration,
        fetch: F,
    ) -> Result<Vec<u8>, ResolveError<E>>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let cached = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Cache read for {} cancelled", key);
                return Err(ResolveError::Cancelled);
            }
            result = self.backend.get(key) => result,
        };

        match cached {
            Ok(Some(bytes)) => {
                tracing::debug!("Cache hit: {}", key);
                return Ok(bytes);
            }
            Ok(None) => tracing::debug!("Cache miss: {}", key),
            Err(e) => tracing::warn!("Cache read failed for {}: {}", key, e),
        }

        let value = fetch().await.map_err(ResolveError::Fetch)?;
        let bytes = serde_json::to_vec(&value).map_err(ResolveError::Serialize)?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Cache write for {} skipped, request cancelled", key);
            }
            result = self.backend.set(key, &bytes, ttl) => {
                if let Err(e) = result {
                    tracing::warn!("Cache write failed for {}: {}", key, e);
                }
            }
        }

        Ok(bytes)
    }
}
