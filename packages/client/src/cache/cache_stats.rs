//! Cache statistics and metrics tracking

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use super::observer::{CacheEvent, CacheObserver};

/// Counters fed by cache events
#[derive(Debug)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: AtomicU64,
    /// Number of lookups that fell through to the origin
    pub misses: AtomicU64,
    /// Requests whose Cache-Control skipped the lookup
    pub bypasses: AtomicU64,
    /// Responses written to the backend
    pub stores: AtomicU64,
    /// Live responses judged uncacheable
    pub skipped: AtomicU64,
    /// Backend, codec and header failures
    pub failures: AtomicU64,
    /// Stats creation time
    pub created_at: Instant,
}

/// Plain copy of the counters at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub bypasses: u64,
    pub stores: u64,
    pub skipped: u64,
    pub failures: u64,
}

impl CacheStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get hit ratio over all lookups
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            (hits as f64) / (total as f64)
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            bypasses: self.bypasses.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    /// Get stats age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

impl Default for CacheStats {
    fn default() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            bypasses: AtomicU64::new(0),
            stores: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            created_at: Instant::now(),
        }
    }
}

impl CacheObserver for CacheStats {
    fn on_event(&self, event: &CacheEvent<'_>) {
        let counter = match event {
            CacheEvent::Hit { .. } => &self.hits,
            CacheEvent::Miss { .. } => &self.misses,
            CacheEvent::Bypass { .. } => &self.bypasses,
            CacheEvent::Stored { .. } => &self.stores,
            CacheEvent::StoreSkipped { .. } => &self.skipped,
            CacheEvent::LookupFailed { .. }
            | CacheEvent::ValidationFailed { .. }
            | CacheEvent::StoreFailed { .. } => &self.failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::cache_key::CacheKey;
    use crate::cache::observer::MissCause;

    #[test]
    fn counts_events() {
        let stats = CacheStats::new();
        let key = CacheKey::derive("GET", "/", None, None);

        stats.on_event(&CacheEvent::Miss { key: &key, cause: MissCause::NotFound });
        stats.on_event(&CacheEvent::Hit {
            key: &key,
            origin: "memory",
            expires_at: chrono::Utc::now(),
        });
        stats.on_event(&CacheEvent::Hit {
            key: &key,
            origin: "memory",
            expires_at: chrono::Utc::now(),
        });
        stats.on_event(&CacheEvent::Bypass { key: &key });

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.hits, 2);
        assert_eq!(snapshot.misses, 1);
        assert_eq!(snapshot.bypasses, 1);
        assert!((stats.hit_ratio() - 2.0 / 3.0).abs() < f64::EPSILON);
    }
}
