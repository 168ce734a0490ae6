//! Port interfaces for decision storage

use std::time::Duration;

use async_trait::async_trait;
use complimask_domain::{DecideResult, Result};

/// Backend memoizing decisions by fingerprint.
///
/// Stores only derived decisions, never raw values. Every error is
/// `MaskError::Cache`; callers treat failures as misses.
#[async_trait]
pub trait DecisionStore: Send + Sync {
    /// Backend label reported by health and info endpoints
    fn name(&self) -> &str;

    async fn get(&self, key: &str) -> Result<Option<DecideResult>>;

    /// Store `result`; `None` uses the backend's default TTL.
    async fn set(&self, key: &str, result: &DecideResult, ttl: Option<Duration>) -> Result<()>;

    /// Returns whether an entry was removed.
    async fn delete(&self, key: &str) -> Result<bool>;

    async fn clear(&self) -> Result<()>;

    /// Current number of entries, if the backend can tell cheaply.
    fn len(&self) -> Option<usize> {
        None
    }

    /// Maximum number of entries, if bounded.
    fn capacity(&self) -> Option<usize> {
        None
    }

    /// Fraction of lookups served from the store, if tracked.
    fn hit_rate(&self) -> Option<f64> {
        None
    }
}
