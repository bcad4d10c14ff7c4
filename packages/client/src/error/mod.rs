pub mod classification;
pub mod constructors;
pub mod detail;
pub mod types;

pub use constructors::*;
pub use detail::{CodecError, ConfigError, ParseError};
pub use types::{Error, Kind, Result};

pub(crate) use types::BoxError;
