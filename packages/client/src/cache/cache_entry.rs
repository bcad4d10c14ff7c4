//! Stored representation of one cached response

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::{Method, Response};

use super::codec::{decode_response, encode_response};
use crate::error::CodecError;

/// Cached response entry with metadata
///
/// Written once on store and only ever read afterwards; the backend owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedEntry {
    /// Method of the request that produced the response
    pub method: Method,
    /// Request URI of that request
    pub uri: String,
    /// When the entry was written
    pub stored_at: DateTime<Utc>,
    /// Full HTTP/1.x encoding of the response
    pub response: Bytes,
    /// Origin tag of the backend that stored it
    pub origin: String,
}

impl CachedEntry {
    /// Create a new cache entry from an HTTP response
    pub fn new(
        method: Method,
        uri: impl Into<String>,
        stored_at: DateTime<Utc>,
        response: &Response<Bytes>,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            method,
            uri: uri.into(),
            stored_at,
            response: encode_response(response),
            origin: origin.into(),
        }
    }

    /// Rebuild the stored response as an answer to a request with `request_method`.
    pub fn to_response(&self, request_method: &Method) -> Result<Response<Bytes>, CodecError> {
        decode_response(self.response.clone(), request_method)
    }

    /// Size in bytes for memory accounting
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        (self.response.len() + self.uri.len() + self.origin.len()) as u64
    }
}
