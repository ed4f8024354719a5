//! Redis-backed cache.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError};

use crate::backend::CacheBackend;
use crate::error::CacheError;

#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    url: String,
    /// Bound on every command after connect
    op_timeout: Duration,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("url", &self.url)
            .field("op_timeout", &self.op_timeout)
            .finish()
    }
}

impl RedisCache {
    /// Connects and pings within `timeout`.
    ///
    /// Accepts either a `redis://` URL or a bare `host:port`. Each later
    /// command fails with [`CacheError::Timeout`] if Redis has not answered
    /// within `op_timeout`.
    pub async fn connect(
        url: &str,
        timeout: Duration,
        op_timeout: Duration,
    ) -> Result<Self, CacheError> {
        let url = normalize_url(url);
        let client = redis::Client::open(url.as_str())?;

        let conn = tokio::time::timeout(timeout, client.get_connection_manager())
            .await
            .map_err(|_| CacheError::ConnectTimeout(timeout))??;

        let cache = Self {
            conn,
            url,
            op_timeout,
        };
        tokio::time::timeout(timeout, cache.ping())
            .await
            .map_err(|_| CacheError::ConnectTimeout(timeout))??;

        tracing::info!("Connected to Redis at {}", cache.url);
        Ok(cache)
    }

    async fn bounded<T>(
        &self,
        command: impl Future<Output = Result<T, RedisError>>,
    ) -> Result<T, CacheError> {
        match tokio::time::timeout(self.op_timeout, command).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(CacheError::Timeout(self.op_timeout)),
        }
    }
}

fn normalize_url(url: &str) -> String {
    if url.contains("://") {
        url.to_string()
    } else {
        format!("redis://{}", url)
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: String = self
            .bounded(redis::cmd("PING").query_async(&mut conn))
            .await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = self.bounded(conn.get(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
        let mut conn = self.conn.clone();
        let _: () = self.bounded(conn.pset_ex(key, value, millis)).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("localhost:6379"), "redis://localhost:6379");
        assert_eq!(normalize_url("redis://cache:6380/1"), "redis://cache:6380/1");
        assert_eq!(normalize_url("rediss://secure:6379"), "rediss://secure:6379");
    }

    #[tokio::test]
    async fn test_connect_unreachable_fails() {
        // Port 1 is never a Redis server.
        let result = RedisCache::connect(
            "127.0.0.1:1",
            Duration::from_millis(500),
            Duration::from_millis(500),
        )
        .await;
        assert!(result.is_err());
    }
}
