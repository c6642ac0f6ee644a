//! Error types for quarry-query

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building, converting or executing queries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed construction input (blank field or value, bad page, empty group).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A conversion finished without producing anything to query on.
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// Failure reported by a search index client.
    #[error("Search index error: {0}")]
    Index(String),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
