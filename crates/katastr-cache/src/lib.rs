//! Response caching for the gateway.
//!
//! Provides a [`CacheBackend`] trait with three implementations:
//! - [`RedisCache`] - production Redis-backed cache
//! - [`MemoryCache`] - in-process cache for development and tests
//! - [`NullCache`] - no-op backend when caching is off or unreachable
//!
//! [`CachedFetcher`] runs the cache-aside flow on top of any backend.

mod backend;
mod error;
mod fetcher;
mod key;
mod memory_cache;
mod null_cache;
mod redis_cache;

pub use backend::CacheBackend;
pub use error::{CacheError, ResolveError};
pub use fetcher::CachedFetcher;
pub use key::cache_key;
pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
