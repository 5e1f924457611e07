//! Error types for equity analysis operations

use thiserror::Error;

/// Analysis pipeline specific errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No raw fact or stage record exists for the ticker
    #[error("No data found for {ticker}")]
    NoData {
        ticker: String,
    },

    /// Aggregation found fewer than the four required stage records
    #[error("Incomplete analysis data")]
    Incomplete,

    /// Market data acquisition failed
    #[error("Data fetching failed: {0}")]
    Fetch(String),

    /// Indicator or scoring function hit unusable input
    #[error("Computation error: {0}")]
    Computation(String),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinance(String),

    /// News API error
    #[error("News API error: {0}")]
    Api(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Convert AnalysisError to analyst_core::Error
impl From<AnalysisError> for analyst_core::Error {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::NoData { ticker } => analyst_core::Error::NoData(ticker),
            other => analyst_core::Error::ProcessingFailed(other.to_string()),
        }
    }
}

/// Convert analyst_core::Error to AnalysisError
impl From<analyst_core::Error> for AnalysisError {
    fn from(err: analyst_core::Error) -> Self {
        match err {
            analyst_core::Error::NoData(ticker) => AnalysisError::NoData { ticker },
            other => AnalysisError::Other(other.to_string()),
        }
    }
}

/// Convert anyhow::Error to AnalysisError
impl From<anyhow::Error> for AnalysisError {
    fn from(err: anyhow::Error) -> Self {
        AnalysisError::Other(err.to_string())
    }
}
