//! Leaf error types carried as the source of [`Error`](super::Error).

use thiserror::Error;

/// A caching header could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid value {value:?} for directive {directive}")]
    InvalidDelta { directive: String, value: String },
    #[error("unparsable {header} header: {value:?}")]
    InvalidDate { header: &'static str, value: String },
    #[error("{header} header is not visible ASCII")]
    InvalidHeaderValue { header: &'static str },
}

/// Stored bytes are not a well-formed HTTP/1.x response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("missing status line")]
    MissingStatusLine,
    #[error("malformed status line: {0:?}")]
    InvalidStatusLine(String),
    #[error("malformed header line: {0:?}")]
    InvalidHeader(String),
    #[error("header section is not terminated")]
    UnterminatedHeaders,
    #[error("body shorter than content-length: expected {expected}, got {actual}")]
    TruncatedBody { expected: usize, actual: usize },
}

/// A configuration value is out of range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("heuristic fraction must be within [0, 1], got {0}")]
    HeuristicFraction(f64),
}
