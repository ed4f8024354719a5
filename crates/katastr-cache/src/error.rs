//! Cache and cache-aside errors.

use std::time::Duration;

use thiserror::Error;

/// Failure of a cache backend operation. Never fatal to a request.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("redis: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("connect timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

/// Failure of [`crate::CachedFetcher::resolve`].
#[derive(Error, Debug)]
pub enum ResolveError<E> {
    /// The fetch closure failed; the error is passed through unchanged.
    #[error(transparent)]
    Fetch(E),

    #[error("serialize response: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("request cancelled")]
    Cancelled,
}
