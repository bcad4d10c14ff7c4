//! In-memory storage backend
//!
//! Lock-free [`CacheStorage`](crate::cache::storage::CacheStorage)
//! implementation on a crossbeam `SkipMap`.
//!
//! - `core`: `MemoryStorage` struct, limits and initialization
//! - `operations`: get/set/delete and the trait implementation
//! - `eviction`: least-recently-used eviction and ttl cleanup
//!
//! Capacity management lives here, in the backend, not in the interceptor.

pub mod core;
pub mod eviction;
pub mod operations;

pub use self::core::{MemoryLimits, MemoryStorage};
