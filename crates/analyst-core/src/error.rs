//! Error types for analyst-core

use thiserror::Error;

/// Result type alias for analyst-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for stage operations
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error message
    #[error("{0}")]
    Generic(String),

    /// No upstream data exists for the requested ticker
    #[error("No data found for {0}")]
    NoData(String),

    /// Stage processing failed
    #[error("Stage processing failed: {0}")]
    ProcessingFailed(String),
}
