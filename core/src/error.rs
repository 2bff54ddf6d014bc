//! Error types for search-core

use crate::DocId;
use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Engine error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Rejected document or stop-word input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Query text failed validation
    #[error("Dirty query: {0}")]
    DirtyQuery(String),

    /// Positional lookup past the end of the document list
    #[error("Position {position} is out of range for {count} documents")]
    OutOfRange { position: usize, count: usize },

    /// Document id lookup for an id that was never added
    #[error("Unknown document: {0}")]
    UnknownDocument(DocId),
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Create a dirty query error
    pub fn dirty_query(msg: impl Into<String>) -> Self {
        Error::DirtyQuery(msg.into())
    }
}
