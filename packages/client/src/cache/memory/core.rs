//! Core MemoryStorage structure and initialization

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use crossbeam_skiplist::SkipMap;
use crossbeam_skiplist::map::Entry;

use crate::cache::cache_entry::CachedEntry;
use crate::cache::clock::{Clock, SystemClock};

/// Origin tag reported when none is configured
pub const DEFAULT_ORIGIN: &str = "memory";

/// Capacity limits enforced by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryLimits {
    /// Maximum number of entries
    pub max_entries: usize,
    /// Maximum memory usage in bytes
    pub max_memory_bytes: u64,
}

impl Default for MemoryLimits {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            max_memory_bytes: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// One stored entry plus backend bookkeeping
#[derive(Debug)]
pub(super) struct Slot {
    /// Unique per write, tells a writer whether its own slot landed
    pub(super) id: u64,
    pub(super) entry: CachedEntry,
    pub(super) deadline: Option<DateTime<Utc>>,
    pub(super) last_accessed: AtomicU64,
}

impl Slot {
    pub(super) fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }
}

/// Lock-free in-memory cache backend using crossbeam skiplist
pub struct MemoryStorage {
    /// Main storage (key -> slot)
    pub(super) entries: SkipMap<String, Slot>,
    pub(super) limits: MemoryLimits,
    /// Current memory usage estimate
    pub(super) memory_usage: AtomicU64,
    pub(super) entry_count: AtomicU64,
    pub(super) evictions: AtomicU64,
    /// Logical access clock for LRU ordering
    pub(super) access_tick: AtomicU64,
    /// Cleanup task running flag
    pub(super) cleanup_running: AtomicBool,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) origin: String,
}

impl MemoryStorage {
    /// Create new storage with default limits
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(MemoryLimits::default())
    }

    #[must_use]
    pub fn with_limits(limits: MemoryLimits) -> Self {
        Self {
            entries: SkipMap::new(),
            limits,
            memory_usage: AtomicU64::new(0),
            entry_count: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            access_tick: AtomicU64::new(0),
            cleanup_running: AtomicBool::new(false),
            clock: Arc::new(SystemClock),
            origin: DEFAULT_ORIGIN.to_string(),
        }
    }

    /// Report `origin` as this instance's tag
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Measure ttl deadlines against `clock`
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current size information: (entries, bytes, evictions so far)
    #[must_use]
    pub fn size_info(&self) -> (usize, u64, u64) {
        (
            self.entry_count.load(Ordering::Relaxed) as usize,
            self.memory_usage.load(Ordering::Relaxed),
            self.evictions.load(Ordering::Relaxed),
        )
    }

    /// Clear all cached entries
    pub fn clear(&self) {
        for entry in self.entries.iter() {
            self.unlink(&entry);
        }
    }

    /// Remove exactly `entry`; counters move only for the caller that unlinked it.
    pub(super) fn unlink(&self, entry: &Entry<'_, String, Slot>) -> bool {
        if !entry.remove() {
            return false;
        }
        self.entry_count.fetch_sub(1, Ordering::Relaxed);
        self.memory_usage
            .fetch_sub(entry.value().entry.size_bytes(), Ordering::Relaxed);
        true
    }

    pub(super) fn next_tick(&self) -> u64 {
        self.access_tick.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStorage")
            .field("entries", &self.entries.len())
            .field("limits", &self.limits)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}
