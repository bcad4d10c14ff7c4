//! Storage adapter contract
//!
//! Any backend (in-memory, distributed, on disk) implements [`CacheStorage`];
//! the interceptor depends only on this trait. Entries are typed as
//! [`CachedEntry`] end to end, so nothing is ever cast back at read time.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::cache_entry::CachedEntry;
use crate::error::Result;

/// Key/value store for cached responses.
///
/// Backends must tolerate concurrent `set` of the same key; the in-tree
/// backend resolves it as last write wins.
pub trait CacheStorage: Send + Sync {
    /// Fetch an entry. A miss is an error of kind `NotFound`.
    fn get(&self, key: &str) -> impl Future<Output = Result<CachedEntry>> + Send;

    /// Store an entry. A zero `ttl` means the backend never expires it on its own.
    fn set(
        &self,
        key: &str,
        entry: CachedEntry,
        ttl: Duration,
    ) -> impl Future<Output = Result<()>> + Send;

    fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send;

    /// Identifies this backend instance in served responses.
    fn origin(&self) -> &str;
}

impl<S: CacheStorage + ?Sized> CacheStorage for Arc<S> {
    fn get(&self, key: &str) -> impl Future<Output = Result<CachedEntry>> + Send {
        (**self).get(key)
    }

    fn set(
        &self,
        key: &str,
        entry: CachedEntry,
        ttl: Duration,
    ) -> impl Future<Output = Result<()>> + Send {
        (**self).set(key, entry, ttl)
    }

    fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send {
        (**self).delete(key)
    }

    fn origin(&self) -> &str {
        (**self).origin()
    }
}
