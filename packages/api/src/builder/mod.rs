//! Cache builder API
//!
//! Fluent assembly of an [`HttpCache`](hache_client::middleware::HttpCache)
//! from a transport, a storage backend and configuration.

pub mod core;

pub use self::core::*;
