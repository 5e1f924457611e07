//! Multi-stage equity analysis pipeline
//!
//! This crate analyzes a single tradable equity by running independent
//! analysis stages over a shared in-memory fact base and merging their
//! outputs into one weighted recommendation:
//!
//! - `DataFetcherAgent`: acquires price history, fundamentals and news
//! - `TechnicalAnalyzerAgent`: RSI, MACD, moving averages, Bollinger Bands
//! - `FundamentalAnalyzerAgent`: valuation, growth, dividend and size rules
//! - `SentimentAnalyzerAgent`: headline polarity via a pluggable scorer
//! - `RiskAnalyzerAgent`: annualized volatility and max drawdown
//! - `ReportGeneratorAgent`: weighted overall score and recommendation band
//!
//! # Architecture
//!
//! All data flows through the [`FactStore`](analyst_core::FactStore): the
//! fetcher writes the raw fact, each stage reads it and writes its own
//! record, and the aggregator reads all four records. Stages never consume
//! each other's return values, so each can be re-run, mocked or replaced
//! independently as long as it upholds the store contract.
//!
//! # Example
//!
//! ```rust,ignore
//! use analyst_core::FactStore;
//! use analyst_stock::{AnalystConfig, Orchestrator, YahooProvider};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(AnalystConfig::default().with_env_api_key());
//!     let provider = Arc::new(YahooProvider::new(Arc::clone(&config)));
//!     let orchestrator = Orchestrator::new(Arc::new(FactStore::new()), provider, config);
//!
//!     let report = orchestrator.run_analysis("AAPL").await?;
//!     println!("{}", report.summary);
//!
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod facts;
pub mod indicators;
pub mod orchestrator;
pub mod report;
pub mod sentiment;

// Re-export main types for convenience
pub use agents::{
    DataFetcherAgent, FundamentalAnalyzerAgent, MarketDataProvider, ReportGeneratorAgent,
    RiskAnalyzerAgent, SentimentAnalyzerAgent, TechnicalAnalyzerAgent, YahooProvider,
};
pub use config::AnalystConfig;
pub use error::{AnalysisError, Result};
pub use facts::{Candle, Fundamentals, NewsItem, RawFact};
pub use orchestrator::{Orchestrator, RunState};
pub use report::{
    FundamentalRecord, Recommendation, Report, RiskLevel, RiskRecord, SentimentRecord,
    TechnicalRecord,
};
pub use sentiment::{LexiconScorer, SentimentScorer};
