//! Cache configuration and preset policies
//!
//! Provides `CacheConfig` for the knobs that change caching decisions:
//! shared vs. private semantics, when the request's own `Cache-Control`
//! bypasses the lookup, the ttl handed to the storage backend, and the
//! heuristic freshness parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::directives::has_token;
use crate::error::ConfigError;

/// When the request's own `Cache-Control` header skips the cache lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheUsePolicy {
    /// Skip the lookup if either `no-cache` or `no-store` is present
    #[default]
    SkipIfEither,
    /// Skip the lookup only if both `no-cache` and `no-store` are present
    SkipIfBoth,
}

impl CacheUsePolicy {
    /// Whether a request carrying `cache_control` may be answered from the cache.
    ///
    /// Matches whole directive tokens case-insensitively, never substrings.
    #[must_use]
    pub fn allows_lookup(self, cache_control: &str) -> bool {
        let no_cache = has_token(cache_control, "no-cache");
        let no_store = has_token(cache_control, "no-store");

        match self {
            CacheUsePolicy::SkipIfEither => !(no_cache || no_store),
            CacheUsePolicy::SkipIfBoth => !(no_cache && no_store),
        }
    }
}

/// Cache behaviour configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Shared cache semantics: honour `s-maxage`, refuse `private` responses
    pub shared: bool,
    /// Lookup bypass rule for request `Cache-Control`
    pub cache_use: CacheUsePolicy,
    /// Ttl passed to the storage backend on write; zero means no backend expiry
    #[serde(with = "seconds")]
    pub entry_ttl: Duration,
    /// Fraction of `Date - Last-Modified` used as heuristic freshness
    pub heuristic_fraction: f64,
    /// Upper bound for heuristic freshness
    #[serde(with = "seconds")]
    pub heuristic_cap: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            shared: true,
            cache_use: CacheUsePolicy::SkipIfEither,
            entry_ttl: Duration::ZERO,
            heuristic_fraction: 0.1,
            heuristic_cap: Duration::from_secs(24 * 60 * 60), // 24 hours
        }
    }
}

impl CacheConfig {
    /// Shared (multi-principal) cache, the default
    #[must_use]
    pub fn shared() -> Self {
        Self::default()
    }

    /// Single-principal cache: `private` responses may be stored and
    /// `s-maxage` is ignored
    #[must_use]
    pub fn private() -> Self {
        Self {
            shared: false,
            ..Self::default()
        }
    }

    /// Shared cache that also bounds every entry in the backend to one day
    /// and never uses heuristic freshness
    #[must_use]
    pub fn strict() -> Self {
        Self {
            entry_ttl: Duration::from_secs(24 * 60 * 60),
            heuristic_fraction: 0.0,
            ..Self::default()
        }
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.heuristic_fraction) {
            return Err(ConfigError::HeuristicFraction(self.heuristic_fraction));
        }
        Ok(())
    }
}

mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_if_either_polarity() {
        let policy = CacheUsePolicy::SkipIfEither;
        assert!(policy.allows_lookup(""));
        assert!(policy.allows_lookup("max-age=0"));
        assert!(!policy.allows_lookup("no-cache"));
        assert!(!policy.allows_lookup("no-store"));
        assert!(!policy.allows_lookup("No-Cache, No-Store"));
    }

    #[test]
    fn skip_if_both_polarity() {
        let policy = CacheUsePolicy::SkipIfBoth;
        assert!(policy.allows_lookup(""));
        assert!(policy.allows_lookup("no-cache"));
        assert!(policy.allows_lookup("no-store"));
        assert!(!policy.allows_lookup("no-cache, no-store"));
    }

    #[test]
    fn token_match_is_not_substring() {
        assert!(CacheUsePolicy::SkipIfEither.allows_lookup("x-no-cache-hint"));
    }

    #[test]
    fn presets() {
        assert!(CacheConfig::shared().shared);
        assert!(!CacheConfig::private().shared);
        assert_eq!(CacheConfig::strict().entry_ttl, Duration::from_secs(86_400));
        assert!(CacheConfig::strict().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_fraction() {
        let config = CacheConfig {
            heuristic_fraction: 1.5,
            ..CacheConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::HeuristicFraction(1.5)));
    }
}
