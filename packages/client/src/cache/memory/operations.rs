//! Get, set and delete for the in-memory backend

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::TimeDelta;

use super::core::{MemoryStorage, Slot};
use crate::cache::cache_entry::CachedEntry;
use crate::cache::storage::CacheStorage;
use crate::error::{self, Result};

impl MemoryStorage {
    /// Get an entry if present and within its ttl
    ///
    /// An entry past its ttl is dropped and reported as `ExpiredEntry`.
    pub fn lookup(&self, key: &str) -> Result<CachedEntry> {
        let Some(slot_ref) = self.entries.get(key) else {
            return Err(error::not_found(key));
        };

        let slot = slot_ref.value();
        if slot.is_expired(self.clock.now()) {
            // only this exact slot; a newer write under the key survives
            self.unlink(&slot_ref);
            return Err(error::expired(key));
        }

        slot.last_accessed.store(self.next_tick(), Ordering::Relaxed);
        Ok(slot.entry.clone())
    }

    /// Store an entry, replacing any previous one under the same key
    ///
    /// Concurrent writers of one key race; exactly one slot survives and the
    /// counters reflect only the slots actually linked and unlinked.
    pub fn store(&self, key: &str, entry: CachedEntry, ttl: Duration) -> Result<()> {
        if self.limits.max_entries == 0 {
            return Err(error::backend("memory storage has zero capacity").with_key(key));
        }

        let size = entry.size_bytes();
        if size > self.limits.max_memory_bytes {
            return Err(error::backend(format!(
                "entry of {size} bytes exceeds the {} byte memory limit",
                self.limits.max_memory_bytes
            ))
            .with_key(key));
        }

        let deadline = if ttl.is_zero() {
            None
        } else {
            let ttl = TimeDelta::from_std(ttl).map_err(|e| error::backend(e).with_key(key))?;
            self.clock.now().checked_add_signed(ttl)
        };

        if let Some(existing) = self.entries.get(key) {
            self.unlink(&existing);
        }
        self.make_room(size);

        let id = self.next_tick();
        let linked = self.entries.get_or_insert(
            key.to_string(),
            Slot {
                id,
                entry,
                deadline,
                last_accessed: AtomicU64::new(id),
            },
        );

        if linked.value().id == id {
            self.entry_count.fetch_add(1, Ordering::Relaxed);
            self.memory_usage.fetch_add(size, Ordering::Relaxed);
        }

        Ok(())
    }

    /// Remove an entry; removing a missing key is not an error
    pub fn remove(&self, key: &str) -> Result<()> {
        self.remove_entry(key);
        Ok(())
    }

    pub(super) fn remove_entry(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|entry| self.unlink(&entry))
    }
}

impl CacheStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<CachedEntry> {
        self.lookup(key)
    }

    async fn set(&self, key: &str, entry: CachedEntry, ttl: Duration) -> Result<()> {
        self.store(key, entry, ttl)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.remove(key)
    }

    fn origin(&self) -> &str {
        &self.origin
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;
    use chrono::{TimeZone, Utc};
    use http::{Method, Response};

    use super::*;
    use crate::cache::clock::ManualClock;
    use crate::cache::memory::MemoryLimits;

    fn entry(body: &'static str) -> CachedEntry {
        let response = Response::new(Bytes::from_static(body.as_bytes()));
        CachedEntry::new(Method::GET, "/x", Utc::now(), &response, "memory")
    }

    #[test]
    fn missing_key_is_not_found() {
        let storage = MemoryStorage::new();
        assert!(storage.lookup("GET /x").unwrap_err().is_not_found());
    }

    #[test]
    fn store_then_lookup() {
        let storage = MemoryStorage::new();
        storage.store("GET /x", entry("a"), Duration::ZERO).unwrap();
        let stored = storage.lookup("GET /x").unwrap();
        assert_eq!(stored.uri, "/x");
        assert!(stored.response.ends_with(b"\r\n\r\na"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn last_write_wins() {
        let storage = MemoryStorage::new();
        storage.store("k", entry("first"), Duration::ZERO).unwrap();
        storage.store("k", entry("second"), Duration::ZERO).unwrap();
        let stored = storage.lookup("k").unwrap();
        assert!(stored.response.ends_with(b"second"));
        assert_eq!(storage.size_info().0, 1);
    }

    #[test]
    fn ttl_expiry_is_a_miss() {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        let storage = MemoryStorage::new().with_clock(clock.clone());
        storage.store("k", entry("a"), Duration::from_secs(10)).unwrap();

        clock.advance(TimeDelta::seconds(9));
        assert!(storage.lookup("k").is_ok());

        clock.advance(TimeDelta::seconds(1));
        let err = storage.lookup("k").unwrap_err();
        assert_eq!(err.kind(), crate::error::Kind::ExpiredEntry);
        assert!(err.is_miss());
        assert!(storage.is_empty());
        assert!(storage.lookup("k").unwrap_err().is_not_found());
    }

    #[test]
    fn delete_is_idempotent() {
        let storage = MemoryStorage::new();
        storage.store("k", entry("a"), Duration::ZERO).unwrap();
        storage.remove("k").unwrap();
        storage.remove("k").unwrap();
        assert!(storage.lookup("k").is_err());
        assert_eq!(storage.size_info(), (0, 0, 0));
    }

    #[test]
    fn zero_capacity_rejects_writes() {
        let storage = MemoryStorage::with_limits(MemoryLimits {
            max_entries: 0,
            max_memory_bytes: 0,
        });
        assert!(storage.store("k", entry("a"), Duration::ZERO).unwrap_err().is_backend());
    }

    #[test]
    fn concurrent_writes_of_one_key_keep_counters_exact() {
        let storage = MemoryStorage::new();
        let barrier = std::sync::Barrier::new(8);

        for _ in 0..50 {
            std::thread::scope(|scope| {
                for _ in 0..8 {
                    scope.spawn(|| {
                        barrier.wait();
                        storage.store("GET /", entry("racing"), Duration::ZERO).unwrap();
                    });
                }
            });

            assert_eq!(storage.len(), 1);
            assert_eq!(storage.size_info().0, 1);
            assert_eq!(storage.size_info().1, entry("racing").size_bytes());
        }

        storage.remove("GET /").unwrap();
        assert_eq!(storage.size_info(), (0, 0, 0));
    }

    #[test]
    fn concurrent_expiry_and_rewrite_keep_counters_exact() {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        let storage = MemoryStorage::new().with_clock(clock.clone());
        let barrier = std::sync::Barrier::new(8);

        for _ in 0..50 {
            storage.store("k", entry("old"), Duration::from_secs(1)).unwrap();
            clock.advance(TimeDelta::seconds(2));

            std::thread::scope(|scope| {
                for n in 0..8 {
                    let storage = &storage;
                    let barrier = &barrier;
                    scope.spawn(move || {
                        barrier.wait();
                        if n % 2 == 0 {
                            let _ = storage.lookup("k");
                        } else {
                            storage.store("k", entry("new"), Duration::ZERO).unwrap();
                        }
                    });
                }
            });

            let (count, bytes, _) = storage.size_info();
            assert_eq!(count, 1);
            assert_eq!(storage.len(), 1);
            assert_eq!(bytes, entry("new").size_bytes());
            storage.clear();
            assert_eq!(storage.size_info().0, 0);
            assert_eq!(storage.size_info().1, 0);
        }
    }

    #[test]
    fn oversized_entry_is_rejected_without_evicting() {
        let small = entry("a").size_bytes();
        let storage = MemoryStorage::with_limits(MemoryLimits {
            max_entries: 10,
            max_memory_bytes: small * 2,
        });
        storage.store("a", entry("a"), Duration::ZERO).unwrap();
        storage.store("b", entry("b"), Duration::ZERO).unwrap();

        let huge = entry("far too large for this backend, by a comfortable margin");
        assert!(huge.size_bytes() > small * 2);
        let err = storage.store("c", huge, Duration::ZERO).unwrap_err();

        assert!(err.is_backend());
        assert_eq!(err.key(), Some("c"));
        assert_eq!(storage.len(), 2);
        assert_eq!(storage.size_info(), (2, small * 2, 0));
    }

    #[tokio::test]
    async fn trait_surface() {
        let storage = MemoryStorage::new().with_origin("edge-1");
        assert_eq!(CacheStorage::origin(&storage), "edge-1");
        storage.set("k", entry("a"), Duration::ZERO).await.unwrap();
        assert!(storage.get("k").await.is_ok());
        storage.delete("k").await.unwrap();
        assert!(storage.get("k").await.unwrap_err().is_not_found());
    }
}
