//! TTL cache with FIFO capacity eviction.

use crate::config::CacheConfig;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    created_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            created_at: Instant::now(),
        }
    }

    /// An entry exactly `ttl` old is still fresh
    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) > ttl
    }
}

#[derive(Debug)]
struct CacheInner<V> {
    /// Insertion order drives eviction; overwriting a key keeps its slot
    store: IndexMap<String, CacheEntry<V>>,
    hits: u64,
    misses: u64,
}

/// Snapshot of cache counters for health reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub size: usize,
    pub max_size: usize,
    pub ttl_seconds: f64,
    pub hits: u64,
    pub misses: u64,
    /// Percentage of lookups served from the cache, `None` before the first lookup
    pub hit_rate: Option<f64>,
}

/// Key → value store with per-entry TTL and a bounded size.
///
/// Every operation takes the internal mutex once, so `get`, `set`,
/// `invalidate` and `clear` are atomic with respect to each other.
#[derive(Debug)]
pub struct TtlCache<V> {
    inner: Mutex<CacheInner<V>>,
    ttl: Duration,
    max_size: usize,
    enabled: bool,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, max_size: usize, enabled: bool) -> Self {
        debug!(
            ttl_seconds = ttl.as_secs_f64(),
            max_size = max_size,
            enabled = enabled,
            "TTL cache created"
        );

        Self {
            inner: Mutex::new(CacheInner {
                store: IndexMap::with_capacity(max_size.min(1024)),
                hits: 0,
                misses: 0,
            }),
            ttl,
            max_size,
            enabled,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.ttl(), config.max_size, config.enabled)
    }

    /// A cache on which every operation is a no-op
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, 0, false)
    }

    /// Look up a key, counting a hit or a miss.
    ///
    /// Expired entries count as misses and are removed on the spot.
    pub fn get(&self, key: &str) -> Option<V> {
        if !self.enabled {
            return None;
        }

        let now = Instant::now();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let expired = match inner.store.get(key) {
            None => {
                inner.misses += 1;
                debug!(key = key, "Cache MISS");
                return None;
            }
            Some(entry) => entry.is_expired(self.ttl, now),
        };

        if expired {
            inner.store.shift_remove(key);
            inner.misses += 1;
            debug!(key = key, "Cache EXPIRED");
            return None;
        }

        inner.hits += 1;
        debug!(key = key, "Cache HIT");
        inner.store.get(key).map(|entry| entry.value.clone())
    }

    /// Store a value, evicting the oldest entry first when a new key would
    /// exceed capacity. Overwriting an existing key never evicts.
    pub fn set(&self, key: &str, value: V) {
        if !self.enabled || self.max_size == 0 {
            return;
        }

        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if inner.store.len() >= self.max_size && !inner.store.contains_key(key) {
            if let Some((oldest, _)) = inner.store.shift_remove_index(0) {
                debug!(key = %oldest, "Cache EVICTED (max_size)");
            }
        }

        inner.store.insert(key.to_string(), CacheEntry::new(value));
        debug!(key = key, "Cache SET");
    }

    /// Remove every key starting with any of `prefixes`; returns how many were removed
    pub fn invalidate(&self, prefixes: &[&str]) -> usize {
        if !self.enabled {
            return 0;
        }

        let mut inner = self.inner.lock();
        let before = inner.store.len();
        inner
            .store
            .retain(|key, _| !prefixes.iter().any(|prefix| key.starts_with(prefix)));
        let removed = before - inner.store.len();

        if removed > 0 {
            debug!(
                removed = removed,
                prefixes = ?prefixes,
                "Cache INVALIDATED"
            );
        }
        removed
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        let count = inner.store.len();
        inner.store.clear();
        if count > 0 {
            debug!(cleared = count, "Cache CLEARED");
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let total = inner.hits + inner.misses;

        CacheStats {
            enabled: self.enabled,
            size: inner.store.len(),
            max_size: self.max_size,
            ttl_seconds: self.ttl.as_secs_f64(),
            hits: inner.hits,
            misses: inner.misses,
            hit_rate: (total > 0).then(|| inner.hits as f64 / total as f64 * 100.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(ttl_secs: u64, max_size: usize) -> TtlCache<String> {
        TtlCache::new(Duration::from_secs(ttl_secs), max_size, true)
    }

    #[test]
    fn test_set_and_get() {
        let cache = cache(60, 10);
        cache.set("funds:1", "Growth Fund I".to_string());
        assert_eq!(cache.get("funds:1"), Some("Growth Fund I".to_string()));
        assert_eq!(cache.get("funds:missing"), None);
    }

    #[test]
    fn test_overwrite_replaces_value_without_growing() {
        let cache = cache(60, 10);
        cache.set("k", "v1".to_string());
        cache.set("k", "v2".to_string());
        assert_eq!(cache.get("k"), Some("v2".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_fresh_at_ttl_boundary() {
        let cache = cache(30, 10);
        cache.set("k", "v".to_string());

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(cache.get("k"), Some("v".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_purged_and_counted_as_miss() {
        let cache = cache(30, 10);
        cache.set("k", "v".to_string());

        tokio::time::advance(Duration::from_millis(30_001)).await;
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.len(), 0);

        let stats = cache.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_evicts_oldest_when_full() {
        let cache = cache(60, 3);
        for key in ["a", "b", "c", "d"] {
            cache.set(key, key.to_uppercase());
        }

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("d"), Some("D".to_string()));
    }

    #[test]
    fn test_updating_existing_key_keeps_fifo_slot() {
        let cache = cache(60, 2);
        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());
        // "a" keeps its original position, so it is still evicted first
        cache.set("a", "3".to_string());
        assert_eq!(cache.len(), 2);

        cache.set("c", "4".to_string());
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some("2".to_string()));
        assert_eq!(cache.get("c"), Some("4".to_string()));
    }

    #[test]
    fn test_invalidate_by_prefix() {
        let cache = cache(60, 10);
        cache.set("funds:list:0:100", "a".to_string());
        cache.set("funds:123", "b".to_string());
        cache.set("investors:list:0:100", "c".to_string());

        assert_eq!(cache.invalidate(&["funds:"]), 2);
        assert_eq!(cache.get("funds:123"), None);
        assert_eq!(cache.get("investors:list:0:100"), Some("c".to_string()));
        assert_eq!(cache.invalidate(&["missing:"]), 0);
    }

    #[test]
    fn test_invalidate_multiple_prefixes() {
        let cache = cache(60, 10);
        cache.set("funds:1", "a".to_string());
        cache.set("investors:1", "b".to_string());
        cache.set("investments:1", "c".to_string());

        assert_eq!(cache.invalidate(&["funds:", "investors:"]), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let cache = cache(60, 10);
        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_disabled_cache_is_noop() {
        let cache: TtlCache<String> = TtlCache::disabled();
        cache.set("k", "v".to_string());
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.invalidate(&["k"]), 0);

        let stats = cache.stats();
        assert!(!stats.enabled);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.hit_rate, None);
    }

    #[test]
    fn test_stats_hit_rate() {
        let cache = cache(60, 10);
        cache.set("k", "v".to_string());
        cache.get("k");
        cache.get("k");
        cache.get("k");
        cache.get("other");

        let stats = cache.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.max_size, 10);
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate, Some(75.0));
    }
}
