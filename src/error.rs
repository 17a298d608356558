//! Error types for solr_dump

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for solr_dump operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for both the fetcher and the loader
#[derive(Debug, Error)]
pub enum Error {
    /// Target directory exists but its permissions forbid writing
    #[error("{} is read-only", path.display())]
    ReadOnlyDirectory { path: PathBuf },

    /// Path exists but is something other than a directory
    #[error("{} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    /// Source directory for a load is missing or unreadable
    #[error("{} is not readable: {cause}", path.display())]
    DirectoryNotFound {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    /// A page request failed; pages before `serial` are already on disk
    #[error("failed to fetch page {serial} of core {core} ({}): {cause}", last_written(*serial))]
    PageFetchFailed {
        core: String,
        serial: u32,
        #[source]
        cause: Box<Error>,
    },

    /// Writing a dump file failed
    #[error("failed to write {}: {cause}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    /// Solr answered an update request with a non-success status
    #[error("update rejected with status {status}: {body}")]
    UpdateRejected {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Loading stopped on the first failed file (fail-fast policy)
    #[error("load aborted at {}: {cause}", file.display())]
    LoadAborted {
        file: PathBuf,
        #[source]
        cause: Box<Error>,
    },

    /// File name filter could not be compiled
    #[error("invalid file pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Transport or HTTP status error
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response or dump file is not the JSON we expect
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn last_written(serial: u32) -> String {
    match serial.checked_sub(1) {
        Some(last) => format!("last written serial {last}"),
        None => "nothing written".to_string(),
    }
}
