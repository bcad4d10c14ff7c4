//! Freshness lifetime arithmetic

use chrono::TimeDelta;

use super::context::ValidationContext;
use crate::cache::cache_config::CacheConfig;
use crate::cache::http_date::HeaderDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Lifetime {
    pub freshness: TimeDelta,
    pub heuristic: bool,
}

impl Lifetime {
    fn explicit(freshness: TimeDelta) -> Self {
        Self {
            freshness: freshness.max(TimeDelta::zero()),
            heuristic: false,
        }
    }
}

/// Precedence: `s-maxage` (shared only), `max-age`, `Expires`,
/// heuristic from `Last-Modified`, else zero.
pub(super) fn freshness_lifetime(ctx: &ValidationContext<'_>, config: &CacheConfig) -> Lifetime {
    let directives = &ctx.response_directives;

    if config.shared
        && let Some(s_maxage) = directives.s_maxage()
    {
        return Lifetime::explicit(TimeDelta::seconds(i64::from(s_maxage)));
    }

    if let Some(max_age) = directives.max_age() {
        return Lifetime::explicit(TimeDelta::seconds(i64::from(max_age)));
    }

    match ctx.expires {
        Some(HeaderDate::Expired) => return Lifetime::explicit(TimeDelta::zero()),
        Some(HeaderDate::At(expires)) => {
            return Lifetime::explicit(expires - ctx.origin_date());
        }
        None => {}
    }

    if let Some(last_modified) = ctx.last_modified {
        let age = ctx.origin_date() - last_modified;
        if age <= TimeDelta::zero() {
            return Lifetime::explicit(TimeDelta::zero());
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        let scaled = TimeDelta::milliseconds((age.num_milliseconds() as f64 * config.heuristic_fraction) as i64);
        let cap = TimeDelta::from_std(config.heuristic_cap).unwrap_or(TimeDelta::MAX);

        return Lifetime {
            freshness: scaled.min(cap),
            heuristic: true,
        };
    }

    Lifetime::explicit(TimeDelta::zero())
}
