//! Reasons a response must not be stored

use std::fmt;

use http::{Method, StatusCode};

use super::context::ValidationContext;
use crate::cache::cache_config::CacheConfig;

/// Why an exchange is not eligible for the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    RequestNoStore,
    ResponseNoStore,
    ResponsePrivate,
    ResponseNoCache,
    StatusNotCacheable(StatusCode),
    MethodNotCacheable(Method),
    PostWithoutFreshness,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::RequestNoStore => f.write_str("request Cache-Control has no-store"),
            Reason::ResponseNoStore => f.write_str("response Cache-Control has no-store"),
            Reason::ResponsePrivate => {
                f.write_str("response Cache-Control has private and the cache is shared")
            }
            Reason::ResponseNoCache => {
                f.write_str("response Cache-Control has no-cache and revalidation is unsupported")
            }
            Reason::StatusNotCacheable(status) => write!(f, "status {status} is not cacheable"),
            Reason::MethodNotCacheable(method) => write!(f, "method {method} is not cacheable"),
            Reason::PostWithoutFreshness => {
                f.write_str("POST response carries no explicit freshness")
            }
        }
    }
}

/// 2xx except 204.
#[must_use]
pub fn is_cacheable_status(status: StatusCode) -> bool {
    status.is_success() && status != StatusCode::NO_CONTENT
}

const NEVER_CACHEABLE: [Method; 6] = [
    Method::PUT,
    Method::DELETE,
    Method::CONNECT,
    Method::OPTIONS,
    Method::TRACE,
    Method::PATCH,
];

pub(super) fn cacheability(ctx: &ValidationContext<'_>, config: &CacheConfig) -> Vec<Reason> {
    let mut reasons = Vec::new();
    let response = &ctx.response_directives;

    if NEVER_CACHEABLE.contains(ctx.method) {
        reasons.push(Reason::MethodNotCacheable(ctx.method.clone()));
    } else if *ctx.method == Method::POST {
        let explicit = response.max_age().is_some()
            || (config.shared && response.s_maxage().is_some())
            || ctx.expires.is_some();
        if !explicit {
            reasons.push(Reason::PostWithoutFreshness);
        }
    }

    if ctx.request_directives.no_store() {
        reasons.push(Reason::RequestNoStore);
    }

    if response.private() && config.shared {
        reasons.push(Reason::ResponsePrivate);
    }

    if response.no_store() {
        reasons.push(Reason::ResponseNoStore);
    }

    if response.no_cache_unqualified() {
        reasons.push(Reason::ResponseNoCache);
    }

    if !is_cacheable_status(ctx.status) {
        reasons.push(Reason::StatusNotCacheable(ctx.status));
    }

    reasons
}
