//! Cache-control evaluation
//!
//! Given one request/response pair and an instant, decide whether the
//! response may be stored (a list of disqualifying [`Reason`]s, empty when
//! eligible) and compute the instant after which it is stale. The same
//! evaluation runs on a fresh origin response before storing it and on a
//! stored response, re-paired with the current request, before serving it.
//!
//! - `context`: header parsing into a [`ValidationContext`]
//! - `cacheability`: disqualifying reasons
//! - `expiration`: freshness lifetime precedence

pub mod cacheability;
pub mod context;
mod expiration;

use chrono::{DateTime, TimeDelta, Utc};

pub use cacheability::{Reason, is_cacheable_status};
pub use context::{Exchange, ValidationContext};

use crate::cache::cache_config::CacheConfig;
use crate::error::ParseError;

/// Outcome of one evaluation.
///
/// `expires_at` is only meaningful when [`is_storable`](Self::is_storable)
/// holds; with an `error` the reasons are not trustworthy either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub reasons: Vec<Reason>,
    pub error: Option<ParseError>,
    pub expires_at: DateTime<Utc>,
    /// Freshness was estimated from `Last-Modified`
    pub heuristic: bool,
}

impl ValidationResult {
    fn failed(error: ParseError, now: DateTime<Utc>) -> Self {
        Self {
            reasons: Vec::new(),
            error: Some(error),
            expires_at: now,
            heuristic: false,
        }
    }

    /// No hard error and no disqualifying reason.
    #[must_use]
    pub fn is_storable(&self) -> bool {
        self.error.is_none() && self.reasons.is_empty()
    }
}

/// Run cacheability and expiration over an already parsed context.
#[must_use]
pub fn evaluate(ctx: &ValidationContext<'_>, config: &CacheConfig) -> ValidationResult {
    let reasons = cacheability::cacheability(ctx, config);
    let lifetime = expiration::freshness_lifetime(ctx, config);

    let expires_at = ctx
        .received_at
        .checked_add_signed(lifetime.freshness)
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    ValidationResult {
        reasons,
        error: None,
        expires_at,
        heuristic: lifetime.heuristic,
    }
}

/// Parse `exchange` and evaluate it; a parse failure lands in
/// [`ValidationResult::error`].
#[must_use]
pub fn validate(
    exchange: Exchange<'_>,
    now: DateTime<Utc>,
    received_at: DateTime<Utc>,
    config: &CacheConfig,
) -> ValidationResult {
    match ValidationContext::new(exchange, now, received_at) {
        Ok(ctx) => evaluate(&ctx, config),
        Err(e) => ValidationResult::failed(e, now),
    }
}

/// Whether a stored response may be served at `ctx.now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

/// Apply the stored response's expiry together with the request's own
/// `max-age` and `min-fresh` limits.
///
/// Request limits only ever tighten the answer. `max-stale` is parsed but
/// never honoured: an entry whose `expires_at` is at or before `now` is
/// always stale. Without request limits this is exactly `now < expires_at`.
#[must_use]
pub fn freshness(ctx: &ValidationContext<'_>, result: &ValidationResult) -> Freshness {
    let request = &ctx.request_directives;
    let age = (ctx.now - ctx.received_at).max(TimeDelta::zero());

    if let Some(max_age) = request.max_age()
        && age > TimeDelta::seconds(i64::from(max_age))
    {
        return Freshness::Stale;
    }

    let mut remaining = result.expires_at - ctx.now;
    if let Some(min_fresh) = request.min_fresh() {
        remaining -= TimeDelta::seconds(i64::from(min_fresh));
    }

    if remaining > TimeDelta::zero() {
        Freshness::Fresh
    } else {
        Freshness::Stale
    }
}
