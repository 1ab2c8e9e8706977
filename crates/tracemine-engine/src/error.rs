use thiserror::Error;

/// Result type for tracemine-engine operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Caller-supplied analysis parameters are out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
