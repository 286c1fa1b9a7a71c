//! Directory errors

use thiserror::Error;

/// Errors that can occur in the airline directory
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Unsupported airline: {0}")]
    UnsupportedAirline(String),

    #[error("Duplicate airline code: {0}")]
    DuplicateCode(String),

    #[error("Alias maps to more than one airline: {0}")]
    AmbiguousAlias(String),
}
