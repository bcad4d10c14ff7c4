use super::detail::{CodecError, ConfigError, ParseError};
use super::types::{BoxError, Error, Kind};

/// Creates an `Error` for a malformed header.
pub fn parse(e: ParseError) -> Error {
    Error::new(Kind::Parse).with(e)
}

/// Creates an `Error` for a lookup miss.
pub fn not_found(key: &str) -> Error {
    Error::new(Kind::NotFound).with_key(key)
}

/// Creates an `Error` for a storage backend failure.
pub fn backend<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Backend).with(e)
}

/// Creates an `Error` for an entry past its freshness lifetime.
pub fn expired(key: &str) -> Error {
    Error::new(Kind::ExpiredEntry).with_key(key)
}

/// Creates an `Error` for a failed live fetch.
pub fn transport<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Transport).with(e)
}

/// Creates an `Error` for a response that could not be encoded or decoded.
pub fn codec(e: CodecError) -> Error {
    Error::new(Kind::Codec).with(e)
}

/// Creates an `Error` for a rejected configuration.
pub fn config(e: ConfigError) -> Error {
    Error::new(Kind::Config).with(e)
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        parse(e)
    }
}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        codec(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        config(e)
    }
}
