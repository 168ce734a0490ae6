//! Core cache implementation with per-entry expiry and insertion-order
//! eviction.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::config::CacheConfig;
use super::stats::{CacheStats, MetricsCollector};
use crate::resilience::{Clock, SystemClock};

/// Entry stored in the cache with its absolute expiry
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Internal storage for cache entries
#[derive(Debug)]
struct CacheStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    entries: HashMap<K, CacheEntry<V>>,
    /// Keys in first-insertion order; re-inserting a key keeps its slot.
    insertion_order: VecDeque<K>,
}

impl<K, V> CacheStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    fn new() -> Self {
        Self { entries: HashMap::new(), insertion_order: VecDeque::new() }
    }

    fn remove(&mut self, key: &K) -> Option<CacheEntry<V>> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.insertion_order.retain(|k| k != key);
        }
        removed
    }

    fn evict_oldest(&mut self) -> Option<K> {
        let key = self.insertion_order.pop_front()?;
        self.entries.remove(&key);
        Some(key)
    }
}

/// Generic thread-safe cache with TTL expiry and insertion-order eviction
///
/// Expired entries are purged lazily on lookup and in bulk by
/// [`Cache::purge_expired`]. When the cache is full, inserting a new key
/// evicts the earliest-inserted key.
///
/// # Type Parameters
/// - `K`: Key type (must be `Eq + Hash + Clone`)
/// - `V`: Value type (must be `Clone`)
/// - `C`: Clock type for time-based operations (defaults to `SystemClock`)
///
/// # Example
/// ```
/// use std::time::Duration;
///
/// use complimask_common::cache::{Cache, CacheConfig};
///
/// let cache: Cache<String, i32> =
///     Cache::new(CacheConfig::ttl_bounded(Duration::from_secs(60), 100));
/// cache.insert("key".to_string(), 42);
/// assert_eq!(cache.get(&"key".to_string()), Some(42));
/// ```
pub struct Cache<K, V, C = SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    storage: Arc<Mutex<CacheStorage<K, V>>>,
    config: CacheConfig,
    metrics: Arc<MetricsCollector>,
    clock: C,
}

impl<K, V> Cache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a new cache with the given configuration using system clock
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<K, V, C> Cache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    /// Create a new cache with a custom clock (useful for testing)
    pub fn with_clock(config: CacheConfig, clock: C) -> Self {
        Self {
            storage: Arc::new(Mutex::new(CacheStorage::new())),
            config,
            metrics: Arc::new(MetricsCollector::default()),
            clock,
        }
    }

    /// Insert a value using the configured default TTL
    pub fn insert(&self, key: K, value: V) -> Option<K> {
        self.insert_with_ttl(key, value, self.config.ttl)
    }

    /// Insert a value with an explicit TTL (`None` = never expires)
    ///
    /// A TTL too large to represent as an instant is treated as no expiry.
    /// Returns the evicted key when a full cache had to make room.
    pub fn insert_with_ttl(&self, key: K, value: V, ttl: Option<Duration>) -> Option<K> {
        let expires_at = ttl.and_then(|ttl| self.clock.now().checked_add(ttl));
        let mut storage = self.storage.lock();
        let mut evicted = None;

        if let Some(entry) = storage.entries.get_mut(&key) {
            *entry = CacheEntry { value, expires_at };
        } else {
            if let Some(max_size) = self.config.max_size {
                if max_size == 0 {
                    return None;
                }
                while storage.entries.len() >= max_size {
                    match storage.evict_oldest() {
                        Some(old) => {
                            self.metrics.record_eviction();
                            evicted = Some(old);
                        }
                        None => break,
                    }
                }
            }
            storage.entries.insert(key.clone(), CacheEntry { value, expires_at });
            storage.insertion_order.push_back(key);
        }

        self.metrics.record_insert();
        evicted
    }

    /// Get a value from the cache
    ///
    /// Returns `None` if the key doesn't exist or has expired; an expired
    /// entry is removed on the way out.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut storage = self.storage.lock();

        let expired = match storage.entries.get(key) {
            None => {
                self.metrics.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(now),
        };

        if expired {
            storage.remove(key);
            self.metrics.record_miss();
            self.metrics.record_expirations(1);
            return None;
        }

        self.metrics.record_hit();
        storage.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Remove a value from the cache
    pub fn remove(&self, key: &K) -> Option<V> {
        self.storage.lock().remove(key).map(|entry| entry.value)
    }

    /// Clear all entries from the cache
    pub fn clear(&self) {
        let mut storage = self.storage.lock();
        storage.entries.clear();
        storage.insertion_order.clear();
    }

    /// Get the current number of entries, including expired entries not yet
    /// purged
    pub fn len(&self) -> usize {
        self.storage.lock().entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove expired entries
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut storage = self.storage.lock();

        let before = storage.entries.len();
        storage.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - storage.entries.len();

        if removed > 0 {
            let CacheStorage { entries, insertion_order } = &mut *storage;
            insertion_order.retain(|k| entries.contains_key(k));
            self.metrics.record_expirations(removed as u64);
        }

        removed
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.metrics.snapshot(self.len(), self.config.max_size)
    }
}

impl<K, V, C> fmt::Debug for Cache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache").field("config", &self.config).field("len", &self.len()).finish()
    }
}

impl<K, V, C> Clone for Cache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: self.config.clone(),
            metrics: Arc::clone(&self.metrics),
            clock: self.clock.clone(),
        }
    }
}
