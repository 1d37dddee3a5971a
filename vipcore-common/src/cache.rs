//! Time-to-live cache with passive expiration.
//!
//! Entries carry their insertion time and are checked on access: an entry
//! whose age has reached the TTL is removed by the lookup that finds it and
//! reported as absent. Nothing runs in the background.

use crate::metrics::CacheMetrics;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A cached value and the moment it was stored.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= ttl
    }
}

/// String-keyed cache whose entries expire a fixed time after insertion.
///
/// A TTL of zero disables caching: nothing is stored and every lookup misses.
/// Values are handed out as clones, so store `Arc`s for anything larger than
/// a handle.
#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    metrics: CacheMetrics,
}

impl<V: Clone> TtlCache<V> {
    /// Create an empty cache. `name` prefixes the metric names.
    #[must_use]
    pub fn new(name: &str, ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
            metrics: CacheMetrics::new(name),
        }
    }

    /// Look up a value, evicting it if it has expired.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Store a value, replacing any previous entry and its age.
    pub fn put(&self, key: impl Into<String>, value: V) {
        self.put_at(key.into(), value, Instant::now());
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let mut entries = self.entries.lock();

        if let Some(entry) = entries.get(key) {
            if !entry.is_expired(self.ttl, now) {
                self.metrics.record_hit();
                return Some(entry.value.clone());
            }
            entries.remove(key);
            self.metrics.record_expiration();
            self.metrics.update_size(entries.len());
        }
        self.metrics.record_miss();
        None
    }

    fn put_at(&self, key: String, value: V, now: Instant) {
        if self.ttl.is_zero() {
            return;
        }
        let mut entries = self.entries.lock();
        entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
            },
        );
        self.metrics.update_size(entries.len());
    }

    /// Remove a single entry.
    pub fn remove(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock();
        let removed = entries.remove(key).map(|entry| entry.value);
        self.metrics.update_size(entries.len());
        removed
    }

    /// Remove every entry.
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        entries.clear();
        self.metrics.update_size(0);
    }

    /// Number of stored entries, expired ones included until they are accessed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// The configured time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Hit, miss and expiry counters of this cache.
    #[must_use]
    pub const fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }
}
