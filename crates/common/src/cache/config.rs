//! Cache configuration

use std::time::Duration;

/// Configuration for cache behavior
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries (None = unlimited)
    pub max_size: Option<usize>,

    /// Default time-to-live for entries (None = no expiration)
    pub ttl: Option<Duration>,
}

impl CacheConfig {
    /// Combined TTL + size bound
    pub fn ttl_bounded(ttl: Duration, max_size: usize) -> Self {
        Self { max_size: Some(max_size), ttl: Some(ttl) }
    }
}
