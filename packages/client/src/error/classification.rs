use super::types::{Error, Kind};

impl Error {
    /// Returns true for a plain lookup miss.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind(), Kind::NotFound)
    }

    /// Returns true if the storage backend itself failed.
    #[must_use]
    pub fn is_backend(&self) -> bool {
        matches!(self.kind(), Kind::Backend)
    }

    /// Returns true if the live fetch failed.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self.kind(), Kind::Transport)
    }

    /// Returns true if a caching header could not be parsed.
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self.kind(), Kind::Parse)
    }

    #[must_use]
    pub fn is_codec(&self) -> bool {
        matches!(self.kind(), Kind::Codec)
    }

    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self.kind(), Kind::Config)
    }

    /// Returns true when the failure means "nothing usable in the cache".
    ///
    /// Both a miss and an expired entry fall back to a live fetch without
    /// being reported as failures.
    #[must_use]
    pub fn is_miss(&self) -> bool {
        matches!(self.kind(), Kind::NotFound | Kind::ExpiredEntry)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{self, CodecError, ParseError};
    use std::error::Error as _;

    #[test]
    fn miss_covers_not_found_and_expired() {
        assert!(error::not_found("GET /").is_miss());
        assert!(error::expired("GET /").is_miss());
        assert!(!error::backend("boom").is_miss());
    }

    #[test]
    fn display_includes_source() {
        let err = error::parse(ParseError::InvalidDelta {
            directive: "max-age".into(),
            value: "abc".into(),
        });
        assert!(err.is_parse());
        assert_eq!(
            err.to_string(),
            "malformed caching header: invalid value \"abc\" for directive max-age"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn key_is_attached() {
        let err = error::not_found("GET /a");
        assert_eq!(err.key(), Some("GET /a"));
        let err = error::codec(CodecError::MissingStatusLine);
        assert!(err.is_codec());
        assert_eq!(err.key(), None);
    }
}
