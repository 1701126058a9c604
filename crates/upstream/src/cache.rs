//! TTL-bounded response cache.
//!
//! Each entry carries its own insertion instant and TTL, and expiry is checked
//! on every read, so correctness never depends on a background sweep. An
//! expired entry is evicted lazily by the read that finds it;
//! [`ResponseCache::purge_expired`] exists only to reclaim memory for keys
//! nobody reads anymore.
//!
//! There is no sliding expiration: reads never extend an entry's life. The
//! cache is in-memory and does not survive a restart.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use log::debug;

/// Default entry lifetime: 30 minutes.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// A cached value with its own expiry bookkeeping.
#[derive(Clone, Debug)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn new(value: V, inserted_at: Instant, ttl: Duration) -> Self {
        Self {
            value,
            inserted_at,
            ttl,
        }
    }

    /// True once `ttl` or more has elapsed since the entry was written.
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= self.ttl
    }
}

/// Thread-safe key → value cache with a fixed TTL.
///
/// Only successful results should ever be written; the cache itself stores
/// whatever it is given. Concurrent writers to the same key are
/// last-write-wins.
pub struct ResponseCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
}

impl<V: Clone> ResponseCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Look up a live entry.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Look up a live entry as of `now`.
    pub fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        {
            let entry = self.entries.get(key)?;
            if !entry.is_expired(now) {
                return Some(entry.value.clone());
            }
        }

        // The read guard is released above; removing while holding it would
        // deadlock the shard.
        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired(now))
            .is_some()
        {
            debug!("Cache entry '{}' expired, evicted", key);
        }
        None
    }

    /// Insert or overwrite `key` with a fresh expiry.
    pub fn put(&self, key: impl Into<String>, value: V) {
        self.put_at(key, value, Instant::now());
    }

    /// Insert or overwrite `key`, with the expiry measured from `now`.
    pub fn put_at(&self, key: impl Into<String>, value: V, now: Instant) {
        let key = key.into();
        debug!("Cache put '{}' (ttl {:?})", key, self.ttl);
        self.entries.insert(key, CacheEntry::new(value, now, self.ttl));
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_put_then_get() {
        let cache = ResponseCache::default();
        cache.put("16:200", "payload".to_string());
        assert_eq!(cache.get("16:200"), Some("payload".to_string()));
        assert_eq!(cache.get("16:100"), None);
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let cache = ResponseCache::new(Duration::from_secs(1800));
        let t0 = Instant::now();
        cache.put_at("16:200", 42u32, t0);

        assert_eq!(cache.get_at("16:200", t0 + Duration::from_secs(1799)), Some(42));
        assert_eq!(cache.get_at("16:200", t0 + Duration::from_secs(1801)), None);
        // The expired read evicted it.
        assert!(cache.is_empty());
    }

    #[test]
    fn test_entry_is_gone_at_exactly_ttl() {
        let cache = ResponseCache::new(Duration::from_secs(1800));
        let t0 = Instant::now();
        cache.put_at("16:200", 1u32, t0);

        assert_eq!(cache.get_at("16:200", t0 + Duration::from_millis(1_799_999)), Some(1));
        assert_eq!(cache.get_at("16:200", t0 + Duration::from_secs(1800)), None);
        // The expired read evicted it.
        assert!(cache.is_empty());
    }

    #[test]
    fn test_reads_do_not_extend_ttl() {
        let cache = ResponseCache::new(Duration::from_secs(10));
        let t0 = Instant::now();
        cache.put_at("k", 1u8, t0);

        for secs in 1..=9 {
            assert_eq!(cache.get_at("k", t0 + Duration::from_secs(secs)), Some(1));
        }
        assert_eq!(cache.get_at("k", t0 + Duration::from_secs(10)), None);
    }

    #[test]
    fn test_overwrite_resets_expiry() {
        let cache = ResponseCache::new(Duration::from_secs(10));
        let t0 = Instant::now();
        cache.put_at("k", "old", t0);
        cache.put_at("k", "new", t0 + Duration::from_secs(8));

        assert_eq!(cache.get_at("k", t0 + Duration::from_secs(15)), Some("new"));
        assert_eq!(cache.get_at("k", t0 + Duration::from_secs(19)), None);
    }

    #[test]
    fn test_purge_expired_keeps_live_entries() {
        let cache = ResponseCache::new(Duration::from_secs(10));
        let t0 = Instant::now();
        cache.put_at("old", 1u8, t0);
        cache.put_at("fresh", 2u8, t0 + Duration::from_secs(9));

        let removed = cache.purge_expired_at(t0 + Duration::from_secs(12));

        assert_eq!(removed, 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_at("fresh", t0 + Duration::from_secs(12)), Some(2));
    }

    #[test]
    fn test_concurrent_puts_last_write_wins() {
        let cache = Arc::new(ResponseCache::default());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        cache.put("shared", i);
                        assert!(cache.get("shared").is_some());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let value = cache.get("shared").unwrap();
        assert!((0..8).contains(&value));
        assert_eq!(cache.len(), 1);
    }
}
