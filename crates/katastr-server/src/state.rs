use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use katastr_cache::{CacheBackend, CachedFetcher, MemoryCache, NullCache, RedisCache};
use katastr_core::{CacheBackendKind, CacheConfig, Config};
use katastr_cuzk::{ClientConfig, CuzkClient, RateLimiter, RetryPolicy};

/// How long cached results live, by kind of lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    /// Searches and polygon queries
    pub search: Duration,
    /// Single-resource lookups by id
    pub detail: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            search: Duration::from_secs(60),
            detail: Duration::from_secs(300),
        }
    }
}

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub client: Arc<CuzkClient>,
    pub fetcher: CachedFetcher,
    pub ttl: TtlPolicy,
    /// Deadline for one inbound request, retries included
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        client: CuzkClient,
        cache: Arc<dyn CacheBackend>,
        ttl: TtlPolicy,
        request_timeout: Duration,
    ) -> Self {
        Self {
            client: Arc::new(client),
            fetcher: CachedFetcher::new(cache),
            ttl,
            request_timeout,
        }
    }

    /// Build the cache backend, rate limiter and upstream client from config.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let cache = build_cache(&config.cache).await;

        let limiter = RateLimiter::new(config.upstream.rate_limit_period(), 1)
            .context("Failed to create rate limiter")?;

        let mut client_config = ClientConfig::new(config.upstream.base_url.as_str())
            .with_timeout(config.upstream.timeout())
            .with_retry(RetryPolicy::new(
                config.upstream.max_attempts,
                config.upstream.backoff_base(),
            ));
        match config.upstream.api_key() {
            Some(key) => client_config = client_config.with_api_key(key),
            None => tracing::warn!("CUZK_API_KEY not set, API calls to CUZK will fail"),
        }

        let client = CuzkClient::new(client_config, Arc::new(limiter))
            .context("Failed to create CUZK client")?;

        let ttl = TtlPolicy {
            search: config.cache.search_ttl(),
            detail: config.cache.detail_ttl(),
        };

        Ok(Self::new(client, cache, ttl, config.server.request_timeout()))
    }
}

/// Redis when reachable; otherwise the gateway runs uncached.
async fn build_cache(config: &CacheConfig) -> Arc<dyn CacheBackend> {
    match config.backend {
        CacheBackendKind::Redis => {
            let connecting =
                RedisCache::connect(&config.redis_url, config.connect_timeout(), config.op_timeout());
            match connecting.await {
                Ok(cache) => Arc::new(cache),
                Err(e) => {
                    tracing::warn!("Redis not available, running without cache: {}", e);
                    Arc::new(NullCache)
                }
            }
        }
        CacheBackendKind::Memory => {
            tracing::info!("Using in-memory response cache");
            Arc::new(MemoryCache::new())
        }
        CacheBackendKind::None => {
            tracing::info!("Response caching disabled");
            Arc::new(NullCache)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_config_without_redis() {
        let mut config = Config::default();
        config.cache.backend = CacheBackendKind::None;
        config.cache.search_ttl_secs = 30;

        let state = AppState::from_config(&config).await.unwrap();

        assert!(!state.fetcher.backend().is_enabled());
        assert!(!state.client.has_api_key());
        assert_eq!(state.ttl.search, Duration::from_secs(30));
        assert_eq!(state.request_timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_unreachable_redis_falls_back() {
        let config = CacheConfig {
            redis_url: "127.0.0.1:1".to_string(),
            connect_timeout_secs: 1,
            ..CacheConfig::default()
        };

        let cache = build_cache(&config).await;
        assert_eq!(cache.name(), "none");
    }

    #[tokio::test]
    async fn test_invalid_upstream_url_fails() {
        let mut config = Config::default();
        config.cache.backend = CacheBackendKind::None;
        config.upstream.base_url = "::not a url".to_string();

        assert!(AppState::from_config(&config).await.is_err());
    }
}
