//! In-process cache with per-entry expiry, for development and tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::backend::CacheBackend;
use crate::error::CacheError;

/// Expired entries are dropped from the map at most this often, on write.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

struct Entries {
    map: HashMap<String, Entry>,
    next_sweep: Instant,
}

pub struct MemoryCache {
    entries: Mutex<Entries>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Entries {
                map: HashMap::new(),
                next_sweep: Instant::now() + SWEEP_INTERVAL,
            }),
        }
    }

    /// Number of stored entries, expired ones included until they are read
    /// or swept.
    pub fn len(&self) -> usize {
        self.entries.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.len())
            .finish()
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut entries = self.entries.lock();
        match entries.map.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.map.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        if now >= entries.next_sweep {
            let before = entries.map.len();
            entries.map.retain(|_, entry| entry.expires_at > now);
            entries.next_sweep = now + SWEEP_INTERVAL;
            tracing::debug!("Swept {} expired cache entries", before - entries.map.len());
        }

        let entry = Entry {
            value: value.to_vec(),
            expires_at: now + ttl,
        };
        entries.map.insert(key.to_string(), entry);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = MemoryCache::new();
        cache.set("k", b"v", Duration::from_secs(60)).await.unwrap();

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get("k").await.unwrap(), Some(b"v".to_vec()));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_sweeps_expired_unread_entries() {
        let cache = MemoryCache::new();
        for i in 0..100 {
            let key = format!("cuzk:parcels:polygon:{:016x}", i);
            cache.set(&key, b"[]", Duration::from_secs(60)).await.unwrap();
        }
        cache.set("detail", b"{}", Duration::from_secs(300)).await.unwrap();
        assert_eq!(cache.len(), 101);

        tokio::time::advance(Duration::from_secs(61)).await;
        cache.set("fresh", b"{}", Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("detail").await.unwrap(), Some(b"{}".to_vec()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_waits_for_interval() {
        let cache = MemoryCache::new();
        cache.set("short", b"{}", Duration::from_secs(1)).await.unwrap();

        tokio::time::advance(Duration::from_secs(5)).await;
        cache.set("other", b"{}", Duration::from_secs(60)).await.unwrap();

        // Expired but not yet swept.
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let cache = MemoryCache::new();
        cache.set("k", b"one", Duration::from_secs(60)).await.unwrap();
        cache.set("k", b"two", Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(cache.len(), 1);
    }
}
