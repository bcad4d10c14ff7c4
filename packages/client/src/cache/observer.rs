//! Notable cache events and the observers that receive them
//!
//! The interceptor never logs on its own. It reports to an injected
//! [`CacheObserver`]; [`TracingObserver`] forwards events to `tracing`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use http::StatusCode;

use super::cache_key::CacheKey;
use super::evaluator::Reason;
use crate::error::{Error, ParseError};

/// Why a lookup did not produce a servable response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissCause {
    /// Nothing stored under the key
    NotFound,
    /// Stored, but past its freshness lifetime
    Expired,
    /// Stored, but no longer eligible for this request
    Ineligible,
}

/// Which side of the exchange a validation failure happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lookup,
    Store,
}

/// Why a live response was not written.
#[derive(Debug, Clone, Copy)]
pub enum SkipCause<'a> {
    /// Status outside 2xx or 204; no evaluation was made
    Status(StatusCode),
    /// Evaluation produced disqualifying reasons
    Ineligible(&'a [Reason]),
}

#[derive(Debug, Clone, Copy)]
pub enum CacheEvent<'a> {
    /// Request `Cache-Control` ruled out a lookup
    Bypass { key: &'a CacheKey },
    Hit {
        key: &'a CacheKey,
        origin: &'a str,
        expires_at: DateTime<Utc>,
    },
    Miss { key: &'a CacheKey, cause: MissCause },
    /// Backend or codec failure while reading; handled as a miss
    LookupFailed { key: &'a CacheKey, error: &'a Error },
    /// Malformed caching header; the exchange is treated as uncacheable
    ValidationFailed {
        key: &'a CacheKey,
        phase: Phase,
        error: &'a ParseError,
    },
    Stored {
        key: &'a CacheKey,
        expires_at: DateTime<Utc>,
    },
    StoreSkipped { key: &'a CacheKey, cause: SkipCause<'a> },
    /// Backend rejected the write; the live response is still returned
    StoreFailed { key: &'a CacheKey, error: &'a Error },
}

pub trait CacheObserver: Send + Sync {
    fn on_event(&self, event: &CacheEvent<'_>);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CacheObserver for NoopObserver {
    fn on_event(&self, _event: &CacheEvent<'_>) {}
}

/// Reports events through `tracing` under the `hache::cache` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CacheObserver for TracingObserver {
    fn on_event(&self, event: &CacheEvent<'_>) {
        match *event {
            CacheEvent::Bypass { key } => {
                tracing::trace!(target: "hache::cache", cache_key = %key, "Request Cache-Control bypasses cache");
            }
            CacheEvent::Hit { key, origin, expires_at } => {
                tracing::debug!(
                    target: "hache::cache",
                    cache_key = %key,
                    origin = origin,
                    expires_at = %expires_at,
                    "Serving response from cache"
                );
            }
            CacheEvent::Miss { key, cause } => {
                tracing::debug!(target: "hache::cache", cache_key = %key, cause = ?cause, "Cache miss");
            }
            CacheEvent::LookupFailed { key, error } => {
                tracing::warn!(
                    target: "hache::cache",
                    cache_key = %key,
                    error = %error,
                    "Failed to retrieve from cache, trying with a live version"
                );
            }
            CacheEvent::ValidationFailed { key, phase, error } => {
                tracing::warn!(
                    target: "hache::cache",
                    cache_key = %key,
                    phase = ?phase,
                    error = %error,
                    "Malformed caching headers, treating exchange as uncacheable"
                );
            }
            CacheEvent::Stored { key, expires_at } => {
                tracing::debug!(
                    target: "hache::cache",
                    cache_key = %key,
                    expires_at = %expires_at,
                    "Response stored in cache"
                );
            }
            CacheEvent::StoreSkipped { key, cause } => {
                tracing::trace!(target: "hache::cache", cache_key = %key, cause = ?cause, "Response not cacheable");
            }
            CacheEvent::StoreFailed { key, error } => {
                tracing::warn!(
                    target: "hache::cache",
                    cache_key = %key,
                    error = %error,
                    "Can't store the response to the cache backend"
                );
            }
        }
    }
}

impl<O: CacheObserver + ?Sized> CacheObserver for Arc<O> {
    fn on_event(&self, event: &CacheEvent<'_>) {
        (**self).on_event(event);
    }
}

impl<A: CacheObserver, B: CacheObserver> CacheObserver for (A, B) {
    fn on_event(&self, event: &CacheEvent<'_>) {
        self.0.on_event(event);
        self.1.on_event(event);
    }
}
