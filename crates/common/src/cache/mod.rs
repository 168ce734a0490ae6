//! Generic in-memory cache with TTL expiry and insertion-order eviction
//!
//! # Features
//!
//! - **Thread-safe**: storage behind `Arc<Mutex<>>`; clones share entries
//! - **Per-entry TTL**: default TTL from config, overridable per insert
//! - **Bounded**: the earliest-inserted key is evicted when full
//! - **Metrics tracking**: hit/miss/eviction/expiration counters
//! - **Testable**: Clock abstraction for deterministic time-based testing
//!
//! # Example
//! ```
//! use std::time::Duration;
//!
//! use complimask_common::cache::{Cache, CacheConfig};
//!
//! let config = CacheConfig::ttl_bounded(Duration::from_secs(1800), 500);
//! let cache: Cache<String, String> = Cache::new(config);
//!
//! cache.insert("session".to_string(), "data".to_string());
//! let stats = cache.stats();
//! assert_eq!(stats.size, 1);
//! ```

mod config;
mod core;
mod stats;

// Re-export public API
pub use self::core::Cache;

pub use config::CacheConfig;
pub use stats::CacheStats;
