//! Day cache: a key-value store with per-entry expiry, plus a typed wrapper
//! that keys parsed sightings by ISO calendar date.
//!
//! Two stores implement [`CacheStore`]: [`MemoryCache`] (in-process,
//! `DashMap`) and [`crate::db::Db`] (SQLite, shared across processes).
//! Both hold the sighting list as a JSON string, so the typed layer is the
//! same for either backend.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use dashmap::DashMap;

use crate::types::Sighting;

/// Default lifetime of a cached day.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value storage with expiry. Implementations differ, the contract does not:
/// `get` returns a value only while its expiry lies in the future, and `set`
/// overwrites any previous value for the key.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;
    fn clear(&self) -> Result<(), CacheError>;
}

/// A single cached value with its expiration time.
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// Thread-safe in-memory cache with time-to-live expiration.
///
/// Expired entries are lazily evicted on the next `get` call for that key.
#[derive(Default)]
pub struct MemoryCache {
    store: DashMap<String, CacheEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        if let Some(entry) = self.store.get(key) {
            if Instant::now() < entry.expires_at {
                return Ok(Some(entry.value.clone()));
            }
        }
        // Re-checked under the shard lock so a concurrent `set` survives.
        self.store
            .remove_if(key, |_, entry| Instant::now() >= entry.expires_at);
        Ok(None)
    }

    fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        self.store.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.store.clear();
        Ok(())
    }
}

/// Typed view over a [`CacheStore`]: calendar day in, sightings out.
#[derive(Clone)]
pub struct DayCache {
    store: Arc<dyn CacheStore>,
}

impl DayCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// In-process cache, for single-instance use and tests.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCache::new()))
    }

    /// Cached sightings for `day`, or `None` when missing or expired.
    pub fn get(&self, day: NaiveDate) -> Result<Option<Vec<Sighting>>, CacheError> {
        match self.store.get(&day_key(day))? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Stores `sightings` for `day`, expiring `ttl` from now.
    pub fn put(&self, day: NaiveDate, sightings: &[Sighting], ttl: Duration) -> Result<(), CacheError> {
        let json = serde_json::to_string(sightings)?;
        self.store.set(&day_key(day), json, ttl)
    }
}

/// Cache key for a day: its ISO date.
pub fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sighting(species: &str, notes: &str) -> Sighting {
        Sighting {
            date: "20/2".into(),
            time: "09:30".into(),
            species: species.into(),
            site: "Titchfield Haven".into(),
            count: "c.20".into(),
            observer: "J Smith".into(),
            notes: notes.into(),
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 2, 20).unwrap()
    }

    #[test]
    fn cache_set_and_get() {
        let cache = MemoryCache::new();
        cache
            .set("key1", "value1".to_string(), Duration::from_secs(60))
            .unwrap();
        assert_eq!(cache.get("key1").unwrap(), Some("value1".to_string()));
    }

    #[test]
    fn cache_miss() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("nonexistent").unwrap(), None);
    }

    #[test]
    fn cache_expiration() {
        let cache = MemoryCache::new();
        cache
            .set("key1", "value1".to_string(), Duration::from_millis(1))
            .unwrap();
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(cache.get("key1").unwrap(), None);
        assert!(!cache.store.contains_key("key1"));
    }

    #[test]
    fn eviction_spares_entry_rewritten_after_expiry() {
        let cache = MemoryCache::new();
        cache
            .set("key1", "stale".to_string(), Duration::from_millis(1))
            .unwrap();
        std::thread::sleep(Duration::from_millis(10));
        // Another caller rewrites the key before the expired entry is evicted.
        cache
            .set("key1", "fresh".to_string(), Duration::from_secs(60))
            .unwrap();
        cache
            .store
            .remove_if("key1", |_, entry| Instant::now() >= entry.expires_at);
        assert_eq!(cache.get("key1").unwrap(), Some("fresh".to_string()));
    }

    #[test]
    fn cache_overwrite() {
        let cache = MemoryCache::new();
        cache.set("key1", "old".to_string(), Duration::from_secs(60)).unwrap();
        cache.set("key1", "new".to_string(), Duration::from_secs(60)).unwrap();
        assert_eq!(cache.get("key1").unwrap(), Some("new".to_string()));
    }

    #[test]
    fn cache_clear() {
        let cache = MemoryCache::new();
        cache.set("a", "1".to_string(), Duration::from_secs(60)).unwrap();
        cache.set("b", "2".to_string(), Duration::from_secs(60)).unwrap();
        cache.clear().unwrap();
        assert_eq!(cache.get("a").unwrap(), None);
        assert_eq!(cache.get("b").unwrap(), None);
    }

    #[test]
    fn day_key_is_iso_date() {
        assert_eq!(day_key(day()), "2020-02-20");
    }

    #[test]
    fn day_cache_round_trips_sightings() {
        let cache = DayCache::in_memory();
        let sightings = vec![
            sighting("Robin", "singing, \"loudly\""),
            sighting("Wren", "é ü"),
        ];
        cache.put(day(), &sightings, Duration::from_secs(60)).unwrap();
        assert_eq!(cache.get(day()).unwrap(), Some(sightings));
    }

    #[test]
    fn day_cache_empty_day_is_a_hit() {
        let cache = DayCache::in_memory();
        cache.put(day(), &[], Duration::from_secs(60)).unwrap();
        assert_eq!(cache.get(day()).unwrap(), Some(vec![]));
    }

    #[test]
    fn day_cache_expires() {
        let cache = DayCache::in_memory();
        cache
            .put(day(), &[sighting("Robin", "")], Duration::from_millis(1))
            .unwrap();
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(cache.get(day()).unwrap(), None);
    }

    #[test]
    fn day_cache_keys_are_per_day() {
        let cache = DayCache::in_memory();
        cache
            .put(day(), &[sighting("Robin", "")], Duration::from_secs(60))
            .unwrap();
        let next = day().succ_opt().unwrap();
        assert_eq!(cache.get(next).unwrap(), None);
    }
}
