//! Errors a candidate repository can report

use std::error::Error;
use std::fmt;

/// Why a repository could not produce a pool
///
/// The engine never surfaces these to search callers; a failed pool is
/// replaced by an empty one and reported as a warning.
#[derive(Debug)]
pub enum StorageError {
    /// The backing service could not be reached
    Connection(String),

    /// The backing service rejected or failed the query
    Query(String),

    /// The backing service did not answer in time
    Timeout(String),

    /// The pool is not provided by this repository
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Connection(msg) => write!(f, "Connection error: {}", msg),
            StorageError::Query(msg) => write!(f, "Query error: {}", msg),
            StorageError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            StorageError::Unavailable(msg) => write!(f, "Unavailable: {}", msg),
        }
    }
}

impl Error for StorageError {}

impl From<StorageError> for crate::WayfindError {
    fn from(err: StorageError) -> Self {
        crate::WayfindError::Storage(err.to_string())
    }
}
