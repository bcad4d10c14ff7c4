//! Request interception
//!
//! [`Transport`] is the seam to whatever actually talks to the origin; the
//! cache interceptor wraps one and is itself a `Transport`, so caches can be
//! stacked for multi-tier setups.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use http::{Request, Response};

use crate::error::Result;

/// Performs a live request against the origin.
pub trait Transport: Send + Sync {
    /// Send `request`; failures should be errors of kind `Transport`.
    fn send(&self, request: Request<Bytes>) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: Request<Bytes>) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        (**self).send(request)
    }
}

/// Cache interceptor module
pub mod cache;
pub use cache::{HttpCache, X_HTTPCACHE, X_HTTPCACHE_ORIGIN, X_HTTPCACHE_STORED_AT};
