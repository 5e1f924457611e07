//! Risk assessment stage

use crate::error::{AnalysisError, Result};
use crate::facts::{RawFact, keys};
use crate::indicators;
use crate::report::{RiskLevel, RiskRecord};
use analyst_core::{FactStore, Stage};
use async_trait::async_trait;
use tracing::info;

/// Stage measuring volatility and drawdown risk
pub struct RiskAnalyzerAgent;

impl RiskAnalyzerAgent {
    /// Create a new risk analyzer
    pub fn new() -> Self {
        Self
    }

    /// Derive volatility, drawdown and risk level, and persist the record
    pub async fn analyze(&self, ticker: &str, store: &FactStore) -> Result<RiskRecord> {
        info!("Starting risk assessment for {ticker}...");

        let fact: RawFact = store
            .get_typed(&keys::raw_fact(ticker))
            .await?
            .ok_or_else(|| AnalysisError::NoData {
                ticker: ticker.to_string(),
            })?;

        let closes = fact.daily_closes();
        if closes.is_empty() {
            return Err(AnalysisError::Computation(format!(
                "empty daily price series for {ticker}"
            )));
        }

        let returns = indicators::daily_returns(&closes);
        let annualized_volatility = indicators::annualized_volatility(&returns);
        let max_drawdown = indicators::max_drawdown(&returns);
        let risk_level = RiskLevel::from_volatility(annualized_volatility);

        let record = RiskRecord {
            annualized_volatility,
            max_drawdown,
            risk_level,
        };

        store.set_typed(keys::risk(ticker), &record).await?;
        info!("Risk assessment completed for {ticker}");
        Ok(record)
    }
}

impl Default for RiskAnalyzerAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Stage for RiskAnalyzerAgent {
    async fn run(&self, ticker: &str, store: &FactStore) -> analyst_core::Result<serde_json::Value> {
        let record = self.analyze(ticker, store).await?;
        serde_json::to_value(&record)
            .map_err(|e| analyst_core::Error::ProcessingFailed(e.to_string()))
    }

    fn name(&self) -> &str {
        "RiskAnalyzerAgent"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::Candle;
    use chrono::{TimeZone, Utc};

    async fn store_with_closes(ticker: &str, closes: &[f64]) -> FactStore {
        let history_daily = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                timestamp: Utc
                    .timestamp_opt(i as i64 * 86_400, 0)
                    .single()
                    .expect("valid ts"),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000,
            })
            .collect();

        let store = FactStore::new();
        let fact = RawFact {
            ticker: ticker.to_string(),
            history_daily,
            ..Default::default()
        };
        store.set_typed(keys::raw_fact(ticker), &fact).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_missing_ticker_errors() {
        let agent = RiskAnalyzerAgent::new();
        let store = FactStore::new();

        let err = agent.analyze("MSFT", &store).await.unwrap_err();
        assert_eq!(err.to_string(), "No data found for MSFT");
    }

    #[tokio::test]
    async fn test_empty_series_is_computation_error() {
        let agent = RiskAnalyzerAgent::new();
        let store = store_with_closes("AAPL", &[]).await;

        let err = agent.analyze("AAPL", &store).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Computation(_)));
    }

    #[tokio::test]
    async fn test_flat_series_is_low_risk() {
        let closes = vec![100.0; 50];
        let agent = RiskAnalyzerAgent::new();
        let store = store_with_closes("AAPL", &closes).await;

        let record = agent.analyze("AAPL", &store).await.unwrap();
        assert_eq!(record.annualized_volatility, 0.0);
        assert_eq!(record.max_drawdown, 0.0);
        assert_eq!(record.risk_level, RiskLevel::Low);
    }

    #[tokio::test]
    async fn test_volatile_series_is_high_risk() {
        // Alternating +-10% daily moves annualize far beyond the 30% bar.
        let closes: Vec<f64> = (0..50)
            .map(|i| if i % 2 == 0 { 100.0 } else { 110.0 })
            .collect();
        let agent = RiskAnalyzerAgent::new();
        let store = store_with_closes("AAPL", &closes).await;

        let record = agent.analyze("AAPL", &store).await.unwrap();
        assert!(record.annualized_volatility > 0.30);
        assert_eq!(record.risk_level, RiskLevel::High);
        assert!(record.max_drawdown < 0.0);
        assert!(record.max_drawdown >= -1.0);
    }

    #[tokio::test]
    async fn test_single_point_series_degenerates_to_zero() {
        let agent = RiskAnalyzerAgent::new();
        let store = store_with_closes("AAPL", &[100.0]).await;

        let record = agent.analyze("AAPL", &store).await.unwrap();
        assert_eq!(record.annualized_volatility, 0.0);
        assert_eq!(record.max_drawdown, 0.0);
        assert_eq!(record.risk_level, RiskLevel::Low);
    }

    #[tokio::test]
    async fn test_record_is_persisted() {
        let agent = RiskAnalyzerAgent::new();
        let store = store_with_closes("AAPL", &[100.0, 101.0, 99.0, 102.0]).await;

        let record = agent.analyze("AAPL", &store).await.unwrap();
        let stored: RiskRecord = store.get_typed("risk_AAPL").await.unwrap().unwrap();
        assert_eq!(stored, record);
    }
}
