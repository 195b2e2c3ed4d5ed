use std::io;
use thiserror::Error;

/// Error type for everything that can go wrong before a search starts.
///
/// A search that terminates without finding a solution is not an error; it
/// is reported through [`crate::result::SearchResult`].
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid map: {0}")]
    InvalidMap(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
