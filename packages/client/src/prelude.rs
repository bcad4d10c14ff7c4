//! Hache Prelude
//!
//! The types most callers need to wire a cache into a client.

pub use crate::cache::{
    CacheConfig, CacheEvent, CacheKey, CacheObserver, CacheStats, CacheStorage, CacheUsePolicy,
    CachedEntry, Clock, MemoryStorage, NoopObserver, SystemClock, TracingObserver,
};
pub use crate::error::{Error, Kind, Result};
pub use crate::middleware::{HttpCache, Transport, X_HTTPCACHE, X_HTTPCACHE_ORIGIN, X_HTTPCACHE_STORED_AT};

// HTTP standard types from http crate
pub use ::http::{HeaderMap, HeaderName, HeaderValue, Method, Request, Response, StatusCode};
pub use bytes::Bytes;
