//! HTTP date parsing and formatting utilities
//!
//! Accepts the three RFC 9110 HTTP-date forms (plus RFC 2822 as a lenient
//! fallback) and distinguishes an absent header from a malformed one, which
//! the evaluator treats very differently.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::ParseError;

/// Value of a date-bearing header after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderDate {
    /// A real point in time
    At(DateTime<Utc>),
    /// The `Expires: 0` / `Expires: -1` convention for "already expired"
    Expired,
}

impl HeaderDate {
    /// Returns the instant, if this is a real date.
    #[must_use]
    pub fn instant(self) -> Option<DateTime<Utc>> {
        match self {
            HeaderDate::At(at) => Some(at),
            HeaderDate::Expired => None,
        }
    }
}

/// Parse HTTP date string following RFC 9110 section 5.6.7
pub fn parse_http_date(date_str: &str) -> Option<DateTime<Utc>> {
    let date_str = date_str.trim();

    // IMF-fixdate (preferred): "Sun, 06 Nov 1994 08:49:37 GMT"
    if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%a, %d %b %Y %H:%M:%S GMT") {
        return Some(dt.and_utc());
    }

    // RFC 850: "Sunday, 06-Nov-94 08:49:37 GMT"
    if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%A, %d-%b-%y %H:%M:%S GMT") {
        return Some(dt.and_utc());
    }

    // asctime: "Sun Nov  6 08:49:37 1994", always GMT
    if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%a %b %e %H:%M:%S %Y") {
        return Some(dt.and_utc());
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    None
}

/// Format a timestamp as an IMF-fixdate string
#[must_use]
pub fn fmt_http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse an optional date header.
///
/// Absent and empty values are `Ok(None)`. When `allow_expired_sentinel` is
/// set (only for `Expires`), `"0"` and `"-1"` mean [`HeaderDate::Expired`].
/// Anything else that does not parse is a hard error.
pub fn parse_optional_header(
    header: &'static str,
    value: Option<&str>,
    allow_expired_sentinel: bool,
) -> Result<Option<HeaderDate>, ParseError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    if allow_expired_sentinel && (value == "0" || value == "-1") {
        return Ok(Some(HeaderDate::Expired));
    }

    parse_http_date(value)
        .map(|at| Some(HeaderDate::At(at)))
        .ok_or_else(|| ParseError::InvalidDate {
            header,
            value: value.to_string(),
        })
}
