use std::error::Error as StdError;
use std::fmt;

/// A Result alias where the Err case is `hache_client::Error`.
pub type Result<T> = std::result::Result<T, Error>;

pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// Represents errors that can occur while serving a request through the cache.
pub struct Error {
    inner: Box<Inner>,
}

struct Inner {
    kind: Kind,
    source: Option<BoxError>,
    key: Option<String>,
}

/// Broad classification of cache failures.
///
/// Only [`Kind::Transport`] ever reaches the caller of the interceptor; every
/// other kind degrades to "behave as if the cache were absent".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Malformed directive or date header
    Parse,
    /// Lookup miss
    NotFound,
    /// Storage backend failure on get/set/delete
    Backend,
    /// Entry found but its freshness lifetime has run out
    ExpiredEntry,
    /// The live fetch itself failed
    Transport,
    /// Stored bytes could not be turned back into a response (or vice versa)
    Codec,
    /// Invalid cache configuration
    Config,
}

impl Error {
    pub fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                source: None,
                key: None,
            }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<BoxError>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    /// Attach the cache key the failing operation was working on.
    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with_key(mut self, key: impl Into<String>) -> Error {
        self.inner.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.inner.kind
    }

    /// Get the cache key associated with this error, if any
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.inner.key.as_deref()
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("hache_client::Error");

        f.field("kind", &self.inner.kind);

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        if let Some(ref key) = self.inner.key {
            f.field("key", key);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.kind {
            Kind::Parse => f.write_str("malformed caching header")?,
            Kind::NotFound => f.write_str("cache entry not found")?,
            Kind::Backend => f.write_str("cache storage backend error")?,
            Kind::ExpiredEntry => f.write_str("cached entry already expired")?,
            Kind::Transport => f.write_str("error sending request")?,
            Kind::Codec => f.write_str("cached response codec error")?,
            Kind::Config => f.write_str("invalid cache configuration")?,
        }

        if let Some(ref source) = self.inner.source {
            write!(f, ": {source}")?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}
