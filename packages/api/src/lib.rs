//! Hache Public API
//!
//! Transparent HTTP response caching with a fluent builder. Wrap any
//! [`Transport`] and pick a storage backend; the resulting [`HttpCache`]
//! answers repeat requests from the backend while their cached responses
//! are still fresh, and is itself a `Transport`.
//!
//! ```no_run
//! # async fn demo<T: hache::Transport>(origin: T) -> hache::Result<()> {
//! use hache::{CacheUsePolicy, Request, Bytes};
//!
//! let cache = hache::in_memory(origin)
//!     .shared(false)
//!     .cache_use(CacheUsePolicy::SkipIfBoth)
//!     .build()?;
//!
//! let request = Request::get("https://example.com/").body(Bytes::new()).expect("valid request");
//! let response = cache.send(request).await?;
//! # let _ = response;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod builder;

pub use builder::*;

// Re-export important types from client package
pub use hache_client::prelude::*;
pub use hache_client::cache::{CacheStatsSnapshot, ManualClock, MemoryLimits};
pub use hache_client::error;

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use chrono::{TimeZone, Utc};

    use super::*;

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl Transport for Counting {
        async fn send(&self, _request: Request<Bytes>) -> Result<Response<Bytes>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Response::builder()
                .header("cache-control", "max-age=60")
                .body(Bytes::from_static(b"hello"))
                .unwrap())
        }
    }

    fn get() -> Request<Bytes> {
        Request::get("http://example.com/").body(Bytes::new()).unwrap()
    }

    #[tokio::test]
    async fn in_memory_caches_repeat_requests() {
        let origin = Arc::new(Counting::default());
        let cache = in_memory(origin.clone()).build().unwrap();

        cache.send(get()).await.unwrap();
        let cached = cache.send(get()).await.unwrap();

        assert_eq!(origin.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cached.headers()[X_HTTPCACHE], "true");
        assert_eq!(cached.headers()[X_HTTPCACHE_ORIGIN], "memory");
    }

    #[test]
    fn fluent_setters_shape_config() {
        let cache = CacheBuilder::new(Counting::default())
            .storage(MemoryStorage::new().with_origin("edge"))
            .shared(false)
            .cache_use(CacheUsePolicy::SkipIfBoth)
            .entry_ttl(Duration::from_secs(30))
            .observer(Arc::new(NoopObserver))
            .build()
            .unwrap();

        let config = cache.config();
        assert!(!config.shared);
        assert_eq!(config.cache_use, CacheUsePolicy::SkipIfBoth);
        assert_eq!(config.entry_ttl, Duration::from_secs(30));
        assert_eq!(cache.storage().origin(), "edge");
    }

    #[test]
    fn build_rejects_invalid_config() {
        let config = CacheConfig {
            heuristic_fraction: -0.5,
            ..CacheConfig::default()
        };
        let Err(err) = in_memory(Counting::default()).config(config).build() else {
            panic!("negative heuristic fraction accepted");
        };
        assert_eq!(err.kind(), Kind::Config);
    }

    #[test]
    fn injected_clock_drives_expiry() {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()));
        let origin = Arc::new(Counting::default());
        let cache = CacheBuilder::new(origin.clone())
            .storage(MemoryStorage::new().with_clock(clock.clone()))
            .clock(clock.clone())
            .build()
            .unwrap();

        tokio_test::block_on(async {
            cache.send(get()).await.unwrap();
            clock.advance(chrono::TimeDelta::seconds(30));
            cache.send(get()).await.unwrap();
            assert_eq!(origin.calls.load(Ordering::SeqCst), 1);

            clock.advance(chrono::TimeDelta::seconds(31));
            cache.send(get()).await.unwrap();
            assert_eq!(origin.calls.load(Ordering::SeqCst), 2);
        });
    }
}
