//! Error types for kmpscout.
//!
//! Validation failures (`EmptyPattern`, `InvalidWorkerCount`) are detected
//! before any scan begins. A search either runs to completion and yields a
//! boolean or is rejected outright; there is no partial-match error.
//!
//! ```rust
//! use kmpscout::{search, SearchError, SearchMode};
//!
//! match search(b"", b"some corpus", SearchMode::Sequential) {
//!     Err(SearchError::EmptyPattern) => {}
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur while preparing or running a search
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Pattern must not be empty")]
    EmptyPattern,
    #[error("Invalid worker count: {0} (must be at least 1)")]
    InvalidWorkerCount(usize),
    #[error("Failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl SearchError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Maps an I/O error raised while touching `path` to the matching variant
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::file_not_found(path),
            io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::IoError(err),
        }
    }
}

impl From<config::ConfigError> for SearchError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}
