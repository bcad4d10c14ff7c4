//! HTTP cache-control semantics and storage
//!
//! This module provides the pieces the interceptor composes:
//! - `directives`: typed `Cache-Control` parsing
//! - `evaluator`: cacheability reasons and freshness lifetime
//! - `cache_key`: per-request lookup keys
//! - `codec`: HTTP/1.x wire form of stored responses
//! - `storage` / `memory`: the backend contract and an in-memory backend
//! - `observer` / `cache_stats`: event reporting

pub mod cache_config;
pub mod cache_entry;
pub mod cache_key;
pub mod cache_stats;
pub mod clock;
pub mod codec;
pub mod directives;
pub mod evaluator;
pub mod http_date;
pub mod memory;
pub mod observer;
pub mod storage;

// Re-export all public types and functions
pub use cache_config::{CacheConfig, CacheUsePolicy};
pub use cache_entry::CachedEntry;
pub use cache_key::CacheKey;
pub use cache_stats::{CacheStats, CacheStatsSnapshot};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{decode_response, encode_response};
pub use directives::{MaxStale, RequestDirectives, ResponseDirectives};
pub use evaluator::{
    Exchange, Freshness, Reason, ValidationContext, ValidationResult, evaluate, freshness,
    is_cacheable_status, validate,
};
pub use http_date::{HeaderDate, fmt_http_date, parse_http_date};
pub use memory::{MemoryLimits, MemoryStorage};
pub use observer::{CacheEvent, CacheObserver, MissCause, NoopObserver, Phase, SkipCause, TracingObserver};
pub use storage::CacheStorage;
