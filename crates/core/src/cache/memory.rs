//! In-process decision cache

use std::time::Duration;

use async_trait::async_trait;
use complimask_common::cache::{Cache, CacheConfig, CacheStats};
use complimask_common::resilience::{Clock, SystemClock};
use complimask_domain::{DecideResult, Result};
use tracing::trace;

use super::ports::DecisionStore;

pub const MEMORY_STORE: &str = "memory";

/// Bounded TTL cache of decisions keyed by fingerprint.
///
/// Entries expire lazily on lookup and through [`purge_expired`]
/// (see [`CacheSweeper`](super::CacheSweeper)). At capacity the oldest
/// inserted entry is evicted.
///
/// [`purge_expired`]: ResultCache::purge_expired
#[derive(Debug)]
pub struct ResultCache<C: Clock = SystemClock> {
    entries: Cache<String, DecideResult, C>,
    max_size: usize,
}

impl ResultCache<SystemClock> {
    /// Cache holding at most `max_size` decisions for `default_ttl` each.
    pub fn new(default_ttl: Duration, max_size: usize) -> Self {
        Self::with_clock(default_ttl, max_size, SystemClock)
    }
}

impl<C: Clock> ResultCache<C> {
    /// As [`ResultCache::new`] with an injected clock.
    pub fn with_clock(default_ttl: Duration, max_size: usize, clock: C) -> Self {
        let config = CacheConfig::ttl_bounded(default_ttl, max_size);
        Self { entries: Cache::with_clock(config, clock), max_size }
    }

    /// Live decision for `key`.
    pub fn lookup(&self, key: &str) -> Option<DecideResult> {
        self.entries.get(&key.to_string())
    }

    /// Cache `result`, with `ttl` overriding the default for this entry.
    pub fn store(&self, key: &str, result: DecideResult, ttl: Option<Duration>) {
        let evicted = match ttl {
            Some(ttl) => self.entries.insert_with_ttl(key.to_string(), result, Some(ttl)),
            None => self.entries.insert(key.to_string(), result),
        };
        if let Some(evicted) = evicted {
            trace!(evicted = %short_key(&evicted), "evicted oldest cached decision");
        }
    }

    /// Drop `key`; returns whether it was cached.
    pub fn remove(&self, key: &str) -> bool {
        self.entries.remove(&key.to_string()).is_some()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Drop expired entries; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.entries.purge_expired()
    }

    /// Entries held, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry is held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit, miss and eviction counters.
    pub fn stats(&self) -> CacheStats {
        self.entries.stats()
    }

    /// Capacity.
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

/// Log-safe prefix of a fingerprint.
pub(crate) fn short_key(key: &str) -> &str {
    key.get(..8).unwrap_or(key)
}

#[async_trait]
impl<C: Clock> DecisionStore for ResultCache<C> {
    fn name(&self) -> &str {
        MEMORY_STORE
    }

    async fn get(&self, key: &str) -> Result<Option<DecideResult>> {
        Ok(self.lookup(key))
    }

    async fn set(&self, key: &str, result: &DecideResult, ttl: Option<Duration>) -> Result<()> {
        self.store(key, result.clone(), ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.remove(key))
    }

    async fn clear(&self) -> Result<()> {
        ResultCache::clear(self);
        Ok(())
    }

    fn len(&self) -> Option<usize> {
        Some(ResultCache::len(self))
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.max_size)
    }

    fn hit_rate(&self) -> Option<f64> {
        Some(self.stats().hit_rate())
    }
}
