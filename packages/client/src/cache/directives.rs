//! `Cache-Control` directive parsing
//!
//! Turns a raw header value into typed request or response directives.
//! Unknown directives are kept as [`Extension`]s rather than rejected, so a
//! single unfamiliar token never poisons the whole header. A malformed value
//! for a recognised numeric directive is a [`ParseError`].

use crate::error::ParseError;

/// Largest delta-seconds value we keep; larger values saturate (RFC 9111 §1.2.2).
pub const MAX_DELTA_SECONDS: u32 = 1 << 31;

/// An unrecognised directive, preserved as received (name lowercased).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub name: String,
    pub value: Option<String>,
}

/// `max-stale` on a request, with or without a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxStale {
    /// Any amount of staleness is acceptable
    Any,
    /// At most this many seconds past expiry
    Limit(u32),
}

/// Directives a client sends on the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDirectives {
    no_cache: bool,
    no_store: bool,
    max_age: Option<u32>,
    min_fresh: Option<u32>,
    max_stale: Option<MaxStale>,
    no_transform: bool,
    only_if_cached: bool,
    extensions: Vec<Extension>,
}

impl RequestDirectives {
    /// Parse a request `Cache-Control` value. Empty input yields no directives.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let mut directives = Self::default();

        for (name, value) in tokens(raw) {
            match name.as_str() {
                "no-cache" => directives.no_cache = true,
                "no-store" => directives.no_store = true,
                "no-transform" => directives.no_transform = true,
                "only-if-cached" => directives.only_if_cached = true,
                "max-age" => set_once(&mut directives.max_age, delta(&name, value)?),
                "min-fresh" => set_once(&mut directives.min_fresh, delta(&name, value)?),
                "max-stale" => {
                    let max_stale = match value {
                        None => MaxStale::Any,
                        Some(v) => MaxStale::Limit(delta(&name, Some(v))?),
                    };
                    set_once(&mut directives.max_stale, max_stale);
                }
                _ => directives.extensions.push(Extension { name, value }),
            }
        }

        Ok(directives)
    }

    pub fn no_cache(&self) -> bool {
        self.no_cache
    }

    pub fn no_store(&self) -> bool {
        self.no_store
    }

    pub fn max_age(&self) -> Option<u32> {
        self.max_age
    }

    pub fn min_fresh(&self) -> Option<u32> {
        self.min_fresh
    }

    pub fn max_stale(&self) -> Option<MaxStale> {
        self.max_stale
    }

    pub fn no_transform(&self) -> bool {
        self.no_transform
    }

    pub fn only_if_cached(&self) -> bool {
        self.only_if_cached
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }
}

/// Directives an origin sends on the response.
///
/// `private` and `no-cache` may carry a field-name list; a bare directive is
/// an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseDirectives {
    public: bool,
    private: Option<Vec<String>>,
    no_cache: Option<Vec<String>>,
    no_store: bool,
    must_revalidate: bool,
    proxy_revalidate: bool,
    max_age: Option<u32>,
    s_maxage: Option<u32>,
    no_transform: bool,
    immutable: bool,
    stale_while_revalidate: Option<u32>,
    stale_if_error: Option<u32>,
    extensions: Vec<Extension>,
}

impl ResponseDirectives {
    /// Parse a response `Cache-Control` value. Empty input yields no directives.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let mut directives = Self::default();

        for (name, value) in tokens(raw) {
            match name.as_str() {
                "public" => directives.public = true,
                "private" => directives.private = Some(field_names(value.as_deref())),
                "no-cache" => directives.no_cache = Some(field_names(value.as_deref())),
                "no-store" => directives.no_store = true,
                "must-revalidate" => directives.must_revalidate = true,
                "proxy-revalidate" => directives.proxy_revalidate = true,
                "no-transform" => directives.no_transform = true,
                "immutable" => directives.immutable = true,
                "max-age" => set_once(&mut directives.max_age, delta(&name, value)?),
                "s-maxage" => set_once(&mut directives.s_maxage, delta(&name, value)?),
                "stale-while-revalidate" => {
                    set_once(&mut directives.stale_while_revalidate, delta(&name, value)?);
                }
                "stale-if-error" => {
                    set_once(&mut directives.stale_if_error, delta(&name, value)?);
                }
                _ => directives.extensions.push(Extension { name, value }),
            }
        }

        Ok(directives)
    }

    pub fn public(&self) -> bool {
        self.public
    }

    /// `private` present, with or without field names.
    pub fn private(&self) -> bool {
        self.private.is_some()
    }

    pub fn private_fields(&self) -> Option<&[String]> {
        self.private.as_deref()
    }

    /// `no-cache` present, with or without field names.
    pub fn no_cache(&self) -> bool {
        self.no_cache.is_some()
    }

    /// `no-cache` with no field names: the whole response needs revalidation.
    pub fn no_cache_unqualified(&self) -> bool {
        self.no_cache.as_ref().is_some_and(Vec::is_empty)
    }

    pub fn no_cache_fields(&self) -> Option<&[String]> {
        self.no_cache.as_deref()
    }

    pub fn no_store(&self) -> bool {
        self.no_store
    }

    pub fn must_revalidate(&self) -> bool {
        self.must_revalidate
    }

    pub fn proxy_revalidate(&self) -> bool {
        self.proxy_revalidate
    }

    pub fn max_age(&self) -> Option<u32> {
        self.max_age
    }

    pub fn s_maxage(&self) -> Option<u32> {
        self.s_maxage
    }

    pub fn no_transform(&self) -> bool {
        self.no_transform
    }

    pub fn immutable(&self) -> bool {
        self.immutable
    }

    pub fn stale_while_revalidate(&self) -> Option<u32> {
        self.stale_while_revalidate
    }

    pub fn stale_if_error(&self) -> Option<u32> {
        self.stale_if_error
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }
}

/// True if `raw` contains `directive` as a whole token (not a substring).
pub fn has_token(raw: &str, directive: &str) -> bool {
    tokens(raw).any(|(name, _)| name == directive)
}

// First occurrence wins.
fn set_once<T>(slot: &mut Option<T>, value: T) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

fn delta(name: &str, value: Option<String>) -> Result<u32, ParseError> {
    let invalid = |value: &str| ParseError::InvalidDelta {
        directive: name.to_string(),
        value: value.to_string(),
    };

    let value = value.unwrap_or_default();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(&value));
    }

    Ok(value
        .parse::<u64>()
        .map_or(MAX_DELTA_SECONDS, |secs| {
            u32::try_from(secs.min(u64::from(MAX_DELTA_SECONDS))).unwrap_or(MAX_DELTA_SECONDS)
        }))
}

fn field_names(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(|f| f.trim().to_ascii_lowercase())
                .filter(|f| !f.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Split a header value into `(lowercased name, unquoted value)` pairs.
///
/// Commas inside a quoted-string do not separate directives.
fn tokens(raw: &str) -> impl Iterator<Item = (String, Option<String>)> + '_ {
    split_outside_quotes(raw).filter_map(|part| {
        let part = part.trim();
        if part.is_empty() {
            return None;
        }

        let (name, value) = match part.split_once('=') {
            Some((name, value)) => (name.trim(), Some(unquote(value.trim()))),
            None => (part, None),
        };

        Some((name.to_ascii_lowercase(), value))
    })
}

fn split_outside_quotes(raw: &str) -> impl Iterator<Item = &str> {
    let mut in_quotes = false;
    let mut escaped = false;

    raw.split(move |c: char| {
        if escaped {
            escaped = false;
            return false;
        }
        match c {
            '\\' if in_quotes => {
                escaped = true;
                false
            }
            '"' => {
                in_quotes = !in_quotes;
                false
            }
            ',' => !in_quotes,
            _ => false,
        }
    })
}

fn unquote(value: &str) -> String {
    match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(inner) => {
            let mut out = String::with_capacity(inner.len());
            let mut chars = inner.chars();
            while let Some(c) = chars.next() {
                if c == '\\' {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                } else {
                    out.push(c);
                }
            }
            out
        }
        None => value.to_string(),
    }
}
