//! Cache interceptor for HTTP requests/responses
//!
//! Every request walks the same path:
//!
//! 1. the request's own `Cache-Control` may rule out a lookup
//!    ([`CacheUsePolicy`](crate::cache::CacheUsePolicy));
//! 2. lookup by derived key; any backend failure, a miss, an undecodable
//!    entry, an ineligible or stale entry all fall through to a live fetch;
//! 3. a fresh, eligible entry is decorated and returned without touching
//!    the origin;
//! 4. otherwise the transport is called exactly once and its error, if any,
//!    is returned verbatim;
//! 5. a successful 2xx (not 204) response is evaluated and, if eligible,
//!    written to the backend. Write failures are reported, never returned.
//!
//! The interceptor holds no mutable state, so one instance can serve any
//! number of concurrent requests. There is no request coalescing: concurrent
//! misses for one key each fetch and each store.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::header::{self, HeaderName, HeaderValue};
use http::{HeaderMap, Method, Request, Response};

use super::Transport;
use crate::cache::cache_config::CacheConfig;
use crate::cache::cache_entry::CachedEntry;
use crate::cache::cache_key::CacheKey;
use crate::cache::clock::{Clock, SystemClock};
use crate::cache::evaluator::{
    Exchange, Freshness, ValidationContext, evaluate, freshness, is_cacheable_status, validate,
};
use crate::cache::http_date::fmt_http_date;
use crate::cache::observer::{CacheEvent, CacheObserver, MissCause, Phase, SkipCause, TracingObserver};
use crate::cache::storage::CacheStorage;
use crate::error::{self, Kind, Result};

/// When the served entry was written (IMF-fixdate)
pub const X_HTTPCACHE_STORED_AT: HeaderName = HeaderName::from_static("x-httpcache-stored-at");
/// `true` on every response served from this cache layer
pub const X_HTTPCACHE: HeaderName = HeaderName::from_static("x-httpcache");
/// Origin tag of the backend that served the response
pub const X_HTTPCACHE_ORIGIN: HeaderName = HeaderName::from_static("x-httpcache-origin");

/// The parts of the request still needed after it is handed to the transport.
struct RequestHead {
    method: Method,
    uri: String,
    headers: HeaderMap,
}

impl RequestHead {
    fn of(request: &Request<Bytes>) -> Self {
        Self {
            method: request.method().clone(),
            uri: request.uri().to_string(),
            headers: request.headers().clone(),
        }
    }

    fn cache_control(&self) -> &str {
        self.headers
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }
}

/// Transparent caching layer around a [`Transport`].
pub struct HttpCache<T, S> {
    transport: T,
    storage: S,
    config: CacheConfig,
    observer: Arc<dyn CacheObserver>,
    clock: Arc<dyn Clock>,
}

impl<T: Transport, S: CacheStorage> HttpCache<T, S> {
    /// Wrap `transport`, caching into `storage` with the default configuration.
    pub fn new(transport: T, storage: S) -> Self {
        Self {
            transport,
            storage,
            config: CacheConfig::default(),
            observer: Arc::new(TracingObserver),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the configuration after checking its ranges.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error when [`CacheConfig::validate`] rejects it.
    pub fn with_config(mut self, config: CacheConfig) -> Result<Self> {
        config.validate().map_err(error::config)?;
        self.config = config;
        Ok(self)
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn CacheObserver>) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Answer `request` from the cache when possible, from the origin otherwise.
    ///
    /// Only a failed live fetch is returned as an error.
    pub async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        let key = CacheKey::from_request(&request);
        let head = RequestHead::of(&request);

        if self.config.cache_use.allows_lookup(head.cache_control()) {
            if let Some(response) = self.lookup(&key, &head).await {
                return Ok(response);
            }
        } else {
            self.observer.on_event(&CacheEvent::Bypass { key: &key });
        }

        let response = self.transport.send(request).await?;
        self.store(&key, &head, &response).await;

        Ok(response)
    }

    async fn lookup(&self, key: &CacheKey, head: &RequestHead) -> Option<Response<Bytes>> {
        let entry = match self.storage.get(key.as_str()).await {
            Ok(entry) => entry,
            Err(e) if e.is_miss() => {
                let cause = if e.kind() == Kind::ExpiredEntry {
                    MissCause::Expired
                } else {
                    MissCause::NotFound
                };
                self.observer.on_event(&CacheEvent::Miss { key, cause });
                return None;
            }
            Err(e) => {
                self.observer.on_event(&CacheEvent::LookupFailed { key, error: &e });
                return None;
            }
        };

        let mut response = match entry.to_response(&head.method) {
            Ok(response) => response,
            Err(e) => {
                let error = error::codec(e).with_key(key.as_str());
                self.observer.on_event(&CacheEvent::LookupFailed { key, error: &error });
                return None;
            }
        };

        let exchange = Exchange {
            method: &head.method,
            request_headers: &head.headers,
            status: response.status(),
            response_headers: response.headers(),
        };
        let ctx = match ValidationContext::new(exchange, self.clock.now(), entry.stored_at) {
            Ok(ctx) => ctx,
            Err(error) => {
                self.observer.on_event(&CacheEvent::ValidationFailed {
                    key,
                    phase: Phase::Lookup,
                    error: &error,
                });
                return None;
            }
        };

        let result = evaluate(&ctx, &self.config);
        if !result.is_storable() {
            self.observer.on_event(&CacheEvent::Miss {
                key,
                cause: MissCause::Ineligible,
            });
            return None;
        }
        if freshness(&ctx, &result) == Freshness::Stale {
            self.observer.on_event(&CacheEvent::Miss {
                key,
                cause: MissCause::Expired,
            });
            return None;
        }

        let origin = self.storage.origin();
        decorate(response.headers_mut(), entry.stored_at, origin);
        self.observer.on_event(&CacheEvent::Hit {
            key,
            origin,
            expires_at: result.expires_at,
        });

        Some(response)
    }

    async fn store(&self, key: &CacheKey, head: &RequestHead, response: &Response<Bytes>) {
        if !is_cacheable_status(response.status()) {
            self.observer.on_event(&CacheEvent::StoreSkipped {
                key,
                cause: SkipCause::Status(response.status()),
            });
            return;
        }

        let now = self.clock.now();
        let exchange = Exchange {
            method: &head.method,
            request_headers: &head.headers,
            status: response.status(),
            response_headers: response.headers(),
        };
        let result = validate(exchange, now, now, &self.config);

        if let Some(ref error) = result.error {
            self.observer.on_event(&CacheEvent::ValidationFailed {
                key,
                phase: Phase::Store,
                error,
            });
            return;
        }
        if !result.reasons.is_empty() {
            self.observer.on_event(&CacheEvent::StoreSkipped {
                key,
                cause: SkipCause::Ineligible(&result.reasons),
            });
            return;
        }

        let entry = CachedEntry::new(
            head.method.clone(),
            head.uri.clone(),
            now,
            response,
            self.storage.origin(),
        );

        match self.storage.set(key.as_str(), entry, self.config.entry_ttl).await {
            Ok(()) => self.observer.on_event(&CacheEvent::Stored {
                key,
                expires_at: result.expires_at,
            }),
            Err(error) => self.observer.on_event(&CacheEvent::StoreFailed { key, error: &error }),
        }
    }
}

impl<T: Transport, S: CacheStorage> Transport for HttpCache<T, S> {
    fn send(
        &self,
        request: Request<Bytes>,
    ) -> impl std::future::Future<Output = Result<Response<Bytes>>> + Send {
        HttpCache::send(self, request)
    }
}

/// Add the three cache markers; nothing already present is touched.
fn decorate(headers: &mut HeaderMap, stored_at: DateTime<Utc>, origin: &str) {
    if let Ok(stored_at) = HeaderValue::from_str(&fmt_http_date(stored_at)) {
        headers.append(X_HTTPCACHE_STORED_AT, stored_at);
    }
    headers.append(X_HTTPCACHE, HeaderValue::from_static("true"));
    headers.append(
        X_HTTPCACHE_ORIGIN,
        HeaderValue::from_str(origin).unwrap_or_else(|_| HeaderValue::from_static("unknown")),
    );
}
