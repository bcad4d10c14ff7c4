//! Cache key derivation
//!
//! A key is `"<METHOD> <REQUEST-URI>"`, with the method exactly as received.
//! When the request says `Cache-Control: private` and carries a non-empty
//! `Authorization`, the raw credential is appended so that private entries
//! of different principals never share a key.
//!
//! This is a deliberately minimal partition. `Vary` is not consulted and no
//! other request header (cookies, `Accept-*`) contributes to the key, so two
//! requests differing only in such headers share one entry.

use std::fmt;

use http::{Request, header};

/// Lookup key for one cacheable request variant. Recomputed on every lookup
/// and store, never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive a key from request components.
    pub fn derive(
        method: &str,
        request_uri: &str,
        cache_control: Option<&str>,
        authorization: Option<&str>,
    ) -> Self {
        let mut key = format!("{method} {request_uri}");

        let private = cache_control.is_some_and(|cc| cc.trim().eq_ignore_ascii_case("private"));
        if private
            && let Some(authorization) = authorization.filter(|a| !a.is_empty())
        {
            key.push(' ');
            key.push_str(authorization);
        }

        Self(key)
    }

    /// Derive the key for `request`. Header values that are not visible
    /// ASCII are treated as absent.
    pub fn from_request<B>(request: &Request<B>) -> Self {
        let headers = request.headers();
        let header_str = |name: header::HeaderName| headers.get(name).and_then(|v| v.to_str().ok());

        Self::derive(
            request.method().as_str(),
            &request.uri().to_string(),
            header_str(header::CACHE_CONTROL),
            header_str(header::AUTHORIZATION),
        )
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
