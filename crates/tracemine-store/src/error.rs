use std::path::PathBuf;
use thiserror::Error;

/// Result type for tracemine-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading a trace store
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Trace directory not found: {}", .0.display())]
    TraceDirNotFound(PathBuf),

    /// A trace file shrank while it was being read.
    #[error(
        "Snapshot inconsistency in {}: expected at least {expected} bytes, found {actual}",
        path.display()
    )]
    SnapshotInconsistency {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },
}

impl Error {
    /// Whether retrying the same read could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::SnapshotInconsistency { .. })
    }
}
