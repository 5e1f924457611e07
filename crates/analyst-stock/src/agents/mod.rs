//! Analysis stage agents

pub mod data_fetcher;
pub mod fundamental_analyzer;
pub mod report_generator;
pub mod risk_analyzer;
pub mod sentiment_analyzer;
pub mod technical_analyzer;

pub use data_fetcher::{DataFetcherAgent, MarketDataProvider, YahooProvider};
pub use fundamental_analyzer::FundamentalAnalyzerAgent;
pub use report_generator::ReportGeneratorAgent;
pub use risk_analyzer::RiskAnalyzerAgent;
pub use sentiment_analyzer::SentimentAnalyzerAgent;
pub use technical_analyzer::TechnicalAnalyzerAgent;
