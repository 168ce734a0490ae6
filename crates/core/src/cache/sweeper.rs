//! Periodic expiry of cached decisions

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use complimask_common::resilience::Clock;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::memory::ResultCache;

/// Background task purging expired entries every `interval`.
///
/// Stops when [`stop`](Self::stop) is called or the handle is dropped.
#[derive(Debug)]
pub struct CacheSweeper {
    shutdown: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl CacheSweeper {
    /// Spawn on the current Tokio runtime.
    ///
    /// Returns `None` when no runtime is active or `interval` is zero.
    pub fn spawn<C: Clock>(cache: Arc<ResultCache<C>>, interval: Duration) -> Option<Self> {
        if interval.is_zero() {
            return None;
        }
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!("Skipping cache sweeper start: no active Tokio runtime detected");
                return None;
            }
        };

        let shutdown = Arc::new(AtomicBool::new(false));
        let stop = Arc::clone(&shutdown);
        let handle = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if stop.load(Ordering::Relaxed) {
                    break;
                }
                let purged = cache.purge_expired();
                if purged > 0 {
                    debug!(purged, remaining = cache.len(), "purged expired decisions");
                }
            }
        });

        Some(Self { shutdown, handle })
    }

    /// Stop the sweep task.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        self.handle.abort();
    }

    /// Whether the sweep task has ended.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for CacheSweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use complimask_common::resilience::MockClock;
    use complimask_domain::DecideResult;

    use super::*;

    /// Validates background purging.
    ///
    /// Assertions:
    /// - Confirms expired entries disappear without a lookup.
    /// - Confirms `stop` ends the task.
    #[tokio::test]
    async fn test_sweeper_purges_expired_entries() {
        let clock = MockClock::new();
        let cache = Arc::new(ResultCache::with_clock(Duration::from_secs(1), 10, clock.clone()));
        cache.store("k", DecideResult::fallback(), None);
        assert_eq!(cache.stats().size, 1);

        let sweeper = CacheSweeper::spawn(Arc::clone(&cache), Duration::from_millis(10)).unwrap();
        clock.advance(Duration::from_secs(2));
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert!(cache.is_empty());
        assert_eq!(cache.stats().expirations, 1);

        sweeper.stop();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(sweeper.is_finished());
    }

    /// Validates the disabled configuration.
    ///
    /// Assertions:
    /// - Confirms a zero interval spawns nothing.
    #[tokio::test]
    async fn test_zero_interval_disabled() {
        let cache = Arc::new(ResultCache::new(Duration::from_secs(1), 10));
        assert!(CacheSweeper::spawn(cache, Duration::ZERO).is_none());
    }
}
