//! In-process page caching.
//!
//! Caches rendered listing payloads with a TTL lifecycle:
//! populate-on-miss, serve-on-hit, expire-on-TTL. There is no write-through
//! invalidation: a listing served from cache may be up to one TTL behind the
//! database. That staleness window is intentional and documented behavior,
//! not a bug.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Default cache TTL for listing pages.
const DEFAULT_TTL_SECS: u64 = 20;

struct CacheEntry {
    stored_at: Instant,
    payload: String,
}

/// Process-wide TTL cache for rendered listing pages.
///
/// Entries are expired lazily: an expired entry is removed on the lookup
/// that finds it stale.
#[derive(Clone)]
pub struct PageCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCache {
    /// Create a new page cache with the default TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(DEFAULT_TTL_SECS))
    }

    /// Create a new page cache with a custom TTL.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Get a cached payload if present and not expired.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        // Fast path: shared lock, hit or clean miss.
        {
            let entries = self.entries.read().unwrap_or_else(std::sync::PoisonError::into_inner);
            match entries.get(key) {
                None => return None,
                Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                    tracing::debug!(key = %key, "Page cache hit");
                    return Some(entry.payload.clone());
                }
                Some(_) => {}
            }
        }

        // Stale entry: drop it under the write lock.
        let mut entries = self.entries.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(entry) = entries.get(key)
            && entry.stored_at.elapsed() >= self.ttl
        {
            entries.remove(key);
            tracing::debug!(key = %key, "Page cache entry expired");
        }
        None
    }

    /// Store a payload under a key, replacing any previous entry.
    pub fn put(&self, key: &str, payload: String) {
        let mut entries = self.entries.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.insert(
            key.to_string(),
            CacheEntry {
                stored_at: Instant::now(),
                payload,
            },
        );
        tracing::debug!(key = %key, "Cached page");
    }

    /// Number of entries currently stored (including not-yet-collected
    /// expired ones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_then_hit() {
        let cache = PageCache::with_ttl(Duration::from_secs(60));
        assert!(cache.get("index:1").is_none());

        cache.put("index:1", "{\"posts\":[]}".to_string());
        assert_eq!(cache.get("index:1").as_deref(), Some("{\"posts\":[]}"));
    }

    #[test]
    fn test_put_replaces() {
        let cache = PageCache::with_ttl(Duration::from_secs(60));
        cache.put("k", "old".to_string());
        cache.put("k", "new".to_string());
        assert_eq!(cache.get("k").as_deref(), Some("new"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expires_after_ttl() {
        let cache = PageCache::with_ttl(Duration::from_millis(30));
        cache.put("k", "v".to_string());
        assert!(cache.get("k").is_some());

        std::thread::sleep(Duration::from_millis(60));
        assert!(cache.get("k").is_none());
        // The expired entry was collected by the lookup.
        assert!(cache.is_empty());
    }

    #[test]
    fn test_keys_are_independent() {
        let cache = PageCache::with_ttl(Duration::from_secs(60));
        cache.put("index:1", "a".to_string());
        cache.put("index:2", "b".to_string());
        assert_eq!(cache.get("index:1").as_deref(), Some("a"));
        assert_eq!(cache.get("index:2").as_deref(), Some("b"));
        assert!(cache.get("index:3").is_none());
    }
}
