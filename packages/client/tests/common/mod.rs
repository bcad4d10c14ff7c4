//! Shared doubles for interceptor tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use hache_client::cache::{CachedEntry, ManualClock, MemoryStorage, MissCause, Phase, SkipCause};
use hache_client::error;
use hache_client::prelude::*;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn get(uri: &str) -> Request<Bytes> {
    Request::get(uri).body(Bytes::new()).unwrap()
}

pub fn get_with(uri: &str, headers: &[(&str, &str)]) -> Request<Bytes> {
    let mut builder = Request::get(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Bytes::new()).unwrap()
}

type Responder = dyn Fn(&Request<Bytes>) -> hache_client::Result<Response<Bytes>> + Send + Sync;

/// Origin double that counts live fetches.
#[derive(Clone)]
pub struct Origin {
    calls: Arc<AtomicUsize>,
    respond: Arc<Responder>,
}

impl Origin {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&Request<Bytes>) -> hache_client::Result<Response<Bytes>> + Send + Sync + 'static,
    {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            respond: Arc::new(respond),
        }
    }

    /// 200 with the given headers and a body naming the fetch number.
    pub fn ok(headers: &[(&'static str, &'static str)]) -> Self {
        Self::status(StatusCode::OK, headers)
    }

    pub fn status(status: StatusCode, headers: &[(&'static str, &'static str)]) -> Self {
        let headers = headers.to_vec();
        let counter = Arc::new(AtomicUsize::new(0));
        Self::new(move |_| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            let mut builder = Response::builder().status(status);
            for (name, value) in &headers {
                builder = builder.header(*name, *value);
            }
            Ok(builder.body(Bytes::from(format!("fetch #{n}"))).unwrap())
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transport for Origin {
    async fn send(&self, request: Request<Bytes>) -> hache_client::Result<Response<Bytes>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.respond)(&request)
    }
}

/// Backend whose reads and/or writes always fail.
#[derive(Default)]
pub struct BrokenStorage {
    pub fail_get: bool,
    pub fail_set: bool,
    pub inner: MemoryStorage,
}

impl CacheStorage for BrokenStorage {
    async fn get(&self, key: &str) -> hache_client::Result<CachedEntry> {
        if self.fail_get {
            return Err(error::backend("connection refused").with_key(key));
        }
        self.inner.lookup(key)
    }

    async fn set(&self, key: &str, entry: CachedEntry, ttl: Duration) -> hache_client::Result<()> {
        if self.fail_set {
            return Err(error::backend("disk full").with_key(key));
        }
        self.inner.store(key, entry, ttl)
    }

    async fn delete(&self, key: &str) -> hache_client::Result<()> {
        self.inner.remove(key)
    }

    fn origin(&self) -> &str {
        "broken"
    }
}

/// Observer that keeps a short label per event.
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl CacheObserver for Recorder {
    fn on_event(&self, event: &CacheEvent<'_>) {
        let label = match event {
            CacheEvent::Bypass { .. } => "bypass".to_string(),
            CacheEvent::Hit { origin, .. } => format!("hit:{origin}"),
            CacheEvent::Miss { cause, .. } => match cause {
                MissCause::NotFound => "miss:not-found".to_string(),
                MissCause::Expired => "miss:expired".to_string(),
                MissCause::Ineligible => "miss:ineligible".to_string(),
            },
            CacheEvent::LookupFailed { .. } => "lookup-failed".to_string(),
            CacheEvent::ValidationFailed { phase, .. } => match phase {
                Phase::Lookup => "invalid:lookup".to_string(),
                Phase::Store => "invalid:store".to_string(),
            },
            CacheEvent::Stored { .. } => "stored".to_string(),
            CacheEvent::StoreSkipped { cause, .. } => match cause {
                SkipCause::Status(status) => format!("skipped:status:{}", status.as_u16()),
                SkipCause::Ineligible(reasons) => format!("skipped:reasons:{}", reasons.len()),
            },
            CacheEvent::StoreFailed { .. } => "store-failed".to_string(),
        };
        self.events.lock().unwrap().push(label);
    }
}

/// Cache over `origin` and a fresh in-memory backend, clocked at `t0()`.
pub fn harness<T: Transport>(origin: T) -> (HttpCache<T, Arc<MemoryStorage>>, Arc<ManualClock>, Arc<Recorder>) {
    harness_with(origin, CacheConfig::default())
}

pub fn harness_with<T: Transport>(
    origin: T,
    config: CacheConfig,
) -> (HttpCache<T, Arc<MemoryStorage>>, Arc<ManualClock>, Arc<Recorder>) {
    let clock = Arc::new(ManualClock::new(t0()));
    let recorder = Arc::new(Recorder::default());
    let storage = Arc::new(MemoryStorage::new().with_clock(clock.clone()));
    let cache = HttpCache::new(origin, storage)
        .with_config(config)
        .unwrap()
        .with_clock(clock.clone())
        .with_observer(recorder.clone());
    (cache, clock, recorder)
}
