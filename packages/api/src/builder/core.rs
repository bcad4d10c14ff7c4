//! Core `CacheBuilder` structure and base functionality
//!
//! The builder collects a transport, a storage backend and the knobs of
//! [`CacheConfig`], then assembles an [`HttpCache`]. The storage type is
//! tracked in the type parameter so that `build` is only reachable once a
//! backend has been chosen.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use hache_client::cache::{CacheConfig, CacheObserver, CacheStorage, CacheUsePolicy, Clock, MemoryStorage};
use hache_client::middleware::{HttpCache, Transport};

/// State marker indicating no storage backend has been chosen
#[derive(Debug, Clone, Copy)]
pub struct StorageNotSet;

/// Fluent builder for an [`HttpCache`]
///
/// Type parameter `S` tracks the storage backend:
/// - `StorageNotSet`: default state, `build` unavailable
/// - any [`CacheStorage`]: ready to build
pub struct CacheBuilder<T, S = StorageNotSet> {
    pub(crate) transport: T,
    pub(crate) storage: S,
    pub(crate) config: CacheConfig,
    pub(crate) observer: Option<Arc<dyn CacheObserver>>,
    pub(crate) clock: Option<Arc<dyn Clock>>,
}

impl<T: Transport> CacheBuilder<T, StorageNotSet> {
    /// Start building a cache in front of `transport`
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            storage: StorageNotSet,
            config: CacheConfig::default(),
            observer: None,
            clock: None,
        }
    }
}

impl<T: Transport, S> CacheBuilder<T, S> {
    /// Choose the storage backend
    #[must_use]
    pub fn storage<B: CacheStorage>(self, storage: B) -> CacheBuilder<T, B> {
        CacheBuilder {
            transport: self.transport,
            storage,
            config: self.config,
            observer: self.observer,
            clock: self.clock,
        }
    }

    /// Replace the whole configuration
    #[must_use]
    pub fn config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Shared (`true`) or private (`false`) cache semantics
    #[must_use]
    pub fn shared(mut self, shared: bool) -> Self {
        self.config.shared = shared;
        self
    }

    /// How the request's own `Cache-Control` bypasses the lookup
    #[must_use]
    pub fn cache_use(mut self, policy: CacheUsePolicy) -> Self {
        self.config.cache_use = policy;
        self
    }

    /// Ttl handed to the backend on every write; zero disables backend expiry
    #[must_use]
    pub fn entry_ttl(mut self, ttl: Duration) -> Self {
        self.config.entry_ttl = ttl;
        self
    }

    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn CacheObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }
}

impl<T: Transport, S: CacheStorage> CacheBuilder<T, S> {
    /// Assemble the cache.
    ///
    /// # Errors
    ///
    /// Returns a config error when the configuration is out of range.
    pub fn build(self) -> hache_client::Result<HttpCache<T, S>> {
        tracing::debug!(
            target: "hache::builder",
            origin = self.storage.origin(),
            shared = self.config.shared,
            cache_use = ?self.config.cache_use,
            entry_ttl_secs = self.config.entry_ttl.as_secs(),
            "building http cache"
        );

        let mut cache = HttpCache::new(self.transport, self.storage).with_config(self.config)?;
        if let Some(observer) = self.observer {
            cache = cache.with_observer(observer);
        }
        if let Some(clock) = self.clock {
            cache = cache.with_clock(clock);
        }
        Ok(cache)
    }
}

/// Builder over a fresh [`MemoryStorage`] with default limits
#[must_use]
pub fn in_memory<T: Transport>(transport: T) -> CacheBuilder<T, MemoryStorage> {
    CacheBuilder::new(transport).storage(MemoryStorage::new())
}

impl<T, S> fmt::Debug for CacheBuilder<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheBuilder")
            .field("config", &self.config)
            .field("observer", &self.observer.is_some())
            .field("clock", &self.clock.is_some())
            .finish_non_exhaustive()
    }
}
