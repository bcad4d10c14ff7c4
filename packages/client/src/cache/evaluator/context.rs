//! Per-evaluation snapshot of one request/response pair

use chrono::{DateTime, Utc};
use http::{HeaderMap, Method, StatusCode, header};

use crate::cache::directives::{RequestDirectives, ResponseDirectives};
use crate::cache::http_date::{HeaderDate, parse_optional_header};
use crate::error::ParseError;

/// Borrowed view of the exchange being judged.
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    pub method: &'a Method,
    pub request_headers: &'a HeaderMap,
    pub status: StatusCode,
    pub response_headers: &'a HeaderMap,
}

/// Everything the evaluator looks at, parsed once.
///
/// `received_at` is when the response was obtained: the evaluation instant
/// for a live response, the storage timestamp for a cached one. Freshness is
/// always measured from it, never from `now`.
#[derive(Debug, Clone)]
pub struct ValidationContext<'a> {
    pub method: &'a Method,
    pub request_headers: &'a HeaderMap,
    pub status: StatusCode,
    pub response_headers: &'a HeaderMap,
    pub request_directives: RequestDirectives,
    pub response_directives: ResponseDirectives,
    pub expires: Option<HeaderDate>,
    pub date: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
    pub now: DateTime<Utc>,
    pub received_at: DateTime<Utc>,
}

impl<'a> ValidationContext<'a> {
    /// Parse every consulted header of `exchange`.
    ///
    /// Fails on the first malformed `Cache-Control`, `Expires`, `Date` or
    /// `Last-Modified` value; absent or empty headers are simply `None`.
    pub fn new(
        exchange: Exchange<'a>,
        now: DateTime<Utc>,
        received_at: DateTime<Utc>,
    ) -> Result<Self, ParseError> {
        let request_cc = joined(exchange.request_headers, &header::CACHE_CONTROL, "Cache-Control")?;
        let request_directives = RequestDirectives::parse(&request_cc)?;

        let response_cc = joined(exchange.response_headers, &header::CACHE_CONTROL, "Cache-Control")?;
        let response_directives = ResponseDirectives::parse(&response_cc)?;

        let expires = parse_optional_header(
            "Expires",
            first(exchange.response_headers, &header::EXPIRES, "Expires")?,
            true,
        )?;
        let date = parse_optional_header(
            "Date",
            first(exchange.response_headers, &header::DATE, "Date")?,
            false,
        )?
        .and_then(HeaderDate::instant);
        let last_modified = parse_optional_header(
            "Last-Modified",
            first(exchange.response_headers, &header::LAST_MODIFIED, "Last-Modified")?,
            false,
        )?
        .and_then(HeaderDate::instant);

        Ok(Self {
            method: exchange.method,
            request_headers: exchange.request_headers,
            status: exchange.status,
            response_headers: exchange.response_headers,
            request_directives,
            response_directives,
            expires,
            date,
            last_modified,
            now,
            received_at,
        })
    }

    /// The instant response ages are measured against: `Date` if the origin
    /// sent one, otherwise receipt time.
    pub fn origin_date(&self) -> DateTime<Utc> {
        self.date.unwrap_or(self.received_at)
    }
}

fn first<'h>(
    headers: &'h HeaderMap,
    name: &header::HeaderName,
    label: &'static str,
) -> Result<Option<&'h str>, ParseError> {
    headers
        .get(name)
        .map(|v| v.to_str().map_err(|_| ParseError::InvalidHeaderValue { header: label }))
        .transpose()
}

// Repeated Cache-Control lines are one comma-separated list.
fn joined(
    headers: &HeaderMap,
    name: &header::HeaderName,
    label: &'static str,
) -> Result<String, ParseError> {
    let mut out = String::new();
    for value in headers.get_all(name) {
        let value = value
            .to_str()
            .map_err(|_| ParseError::InvalidHeaderValue { header: label })?;
        if !out.is_empty() {
            out.push_str(", ");
        }
        out.push_str(value);
    }
    Ok(out)
}
