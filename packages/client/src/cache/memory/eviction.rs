//! Cache eviction and cleanup operations
//!
//! Least-recently-used eviction and expired entry cleanup for the
//! in-memory backend.

use std::sync::atomic::Ordering;

use super::core::MemoryStorage;

impl MemoryStorage {
    /// Evict least recently used entries until an entry of `incoming` bytes fits.
    /// Returns the number of entries actually evicted
    pub(super) fn make_room(&self, incoming: u64) -> u32 {
        let over_limits = |storage: &Self| {
            let entries = storage.entry_count.load(Ordering::Relaxed) as usize;
            let memory = storage.memory_usage.load(Ordering::Relaxed);
            entries >= storage.limits.max_entries
                || memory.saturating_add(incoming) > storage.limits.max_memory_bytes
        };

        if !over_limits(self) {
            return 0;
        }

        self.purge_expired();

        // Oldest first
        let mut candidates: Vec<_> = self.entries.iter().collect();
        candidates.sort_by_key(|slot| slot.value().last_accessed.load(Ordering::Relaxed));

        let mut evicted_count = 0;
        for slot in candidates {
            if !over_limits(self) {
                break;
            }
            if self.unlink(&slot) {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                evicted_count += 1;
            }
        }

        if evicted_count > 0 {
            tracing::debug!(
                target: "hache::storage::memory",
                evicted_count = evicted_count,
                max_entries = self.limits.max_entries,
                max_memory = self.limits.max_memory_bytes,
                "Memory storage evicted entries to make room"
            );
        }

        evicted_count
    }

    /// Clean up entries past their ttl
    pub fn purge_expired(&self) -> usize {
        if self
            .cleanup_running
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return 0; // Cleanup already running
        }

        let now = self.clock.now();
        let purged = self
            .entries
            .iter()
            .filter(|slot| slot.value().is_expired(now) && self.unlink(slot))
            .count();

        self.cleanup_running.store(false, Ordering::Release);
        purged
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use bytes::Bytes;
    use chrono::{TimeDelta, TimeZone, Utc};
    use http::{Method, Response};

    use crate::cache::cache_entry::CachedEntry;
    use crate::cache::clock::ManualClock;
    use crate::cache::memory::{MemoryLimits, MemoryStorage};

    fn entry() -> CachedEntry {
        CachedEntry::new(Method::GET, "/", Utc::now(), &Response::new(Bytes::new()), "memory")
    }

    #[test]
    fn evicts_least_recently_used() {
        let storage = MemoryStorage::with_limits(MemoryLimits {
            max_entries: 2,
            max_memory_bytes: u64::MAX,
        });
        storage.store("a", entry(), Duration::ZERO).unwrap();
        storage.store("b", entry(), Duration::ZERO).unwrap();
        // touch "a" so "b" becomes the oldest
        storage.lookup("a").unwrap();
        storage.store("c", entry(), Duration::ZERO).unwrap();

        assert!(storage.lookup("a").is_ok());
        assert!(storage.lookup("b").is_err());
        assert!(storage.lookup("c").is_ok());
        assert_eq!(storage.size_info().2, 1);
    }

    #[test]
    fn evicts_on_memory_pressure() {
        let size = entry().size_bytes();
        let storage = MemoryStorage::with_limits(MemoryLimits {
            max_entries: 100,
            max_memory_bytes: size * 2,
        });
        for key in ["a", "b", "c"] {
            storage.store(key, entry(), Duration::ZERO).unwrap();
        }
        assert_eq!(storage.len(), 2);
        assert!(storage.lookup("a").is_err());
    }

    #[test]
    fn purge_removes_only_expired() {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        let storage = MemoryStorage::new().with_clock(clock.clone());
        storage.store("short", entry(), Duration::from_secs(1)).unwrap();
        storage.store("forever", entry(), Duration::ZERO).unwrap();

        clock.advance(TimeDelta::seconds(5));
        assert_eq!(storage.purge_expired(), 1);
        assert_eq!(storage.len(), 1);
        assert!(storage.lookup("forever").is_ok());
    }
}
