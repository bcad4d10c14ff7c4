//! # Hache client core
//!
//! Transparent HTTP response caching for a client's request path.
//!
//! An [`HttpCache`] wraps any [`Transport`] and a [`CacheStorage`] backend.
//! Each request is answered from storage when HTTP cache-control semantics
//! allow it, otherwise fetched live and, when eligible, stored for reuse.
//!
//! ## Features
//!
//! - **Cache-Control evaluation**: typed request/response directives,
//!   `s-maxage` / `max-age` / `Expires` / heuristic freshness precedence
//! - **Private partitioning**: `Cache-Control: private` requests are keyed by
//!   their `Authorization` credential
//! - **Fault tolerance**: backend, codec and header failures degrade to a
//!   live fetch; only a failed live fetch is an error
//! - **Pluggable storage** with a lock-free in-memory backend
//! - **Injected observer** for hits, misses, stores and failures
//!
//! Not provided: conditional revalidation, request coalescing.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use hache_client::{HttpCache, MemoryStorage, Transport};
//! use http::{Request, Response};
//!
//! struct Origin;
//!
//! impl Transport for Origin {
//!     async fn send(&self, _request: Request<Bytes>) -> hache_client::Result<Response<Bytes>> {
//!         Ok(Response::builder()
//!             .header("cache-control", "max-age=60")
//!             .body(Bytes::from_static(b"hello"))
//!             .unwrap())
//!     }
//! }
//!
//! # async fn run() -> hache_client::Result<()> {
//! let cache = HttpCache::new(Origin, MemoryStorage::new());
//! let request = Request::get("http://example.com/").body(Bytes::new()).unwrap();
//! let response = cache.send(request).await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod cache;
pub mod error;
pub mod middleware;
pub mod prelude;

pub use cache::{
    CacheConfig, CacheEvent, CacheKey, CacheObserver, CacheStats, CacheStorage, CacheUsePolicy,
    CachedEntry, MemoryStorage, TracingObserver,
};
pub use error::{Error, Kind, Result};
pub use middleware::{HttpCache, Transport};
