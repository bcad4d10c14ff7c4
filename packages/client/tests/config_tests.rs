use std::time::Duration;

use hache_client::cache::{CacheConfig, CacheUsePolicy};

#[test]
fn partial_config_fills_defaults() {
    let config: CacheConfig = serde_json::from_str(r#"{"shared": false, "entry_ttl": 300}"#).unwrap();

    assert!(!config.shared);
    assert_eq!(config.entry_ttl, Duration::from_secs(300));
    assert_eq!(config.cache_use, CacheUsePolicy::SkipIfEither);
    assert_eq!(config.heuristic_cap, Duration::from_secs(86_400));
    assert!(config.validate().is_ok());
}

#[test]
fn cache_use_is_snake_case() {
    let config: CacheConfig = serde_json::from_str(r#"{"cache_use": "skip_if_both"}"#).unwrap();
    assert_eq!(config.cache_use, CacheUsePolicy::SkipIfBoth);

    let json = serde_json::to_value(CacheConfig::strict()).unwrap();
    assert_eq!(json["cache_use"], "skip_if_either");
    assert_eq!(json["entry_ttl"], 86_400);
}

#[test]
fn out_of_range_fraction_parses_but_fails_validation() {
    let config: CacheConfig = serde_json::from_str(r#"{"heuristic_fraction": 2.0}"#).unwrap();
    assert!(config.validate().is_err());
}
