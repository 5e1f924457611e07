//! Fundamental analysis stage

use crate::error::{AnalysisError, Result};
use crate::facts::{RawFact, keys};
use crate::report::FundamentalRecord;
use analyst_core::{FactStore, Stage};
use async_trait::async_trait;
use tracing::info;

const LARGE_CAP_THRESHOLD: f64 = 10_000_000_000.0;

/// Stage scoring valuation, growth expectation, dividend and size
pub struct FundamentalAnalyzerAgent;

impl FundamentalAnalyzerAgent {
    /// Create a new fundamental analyzer
    pub fn new() -> Self {
        Self
    }

    /// Score the fundamentals and persist the record
    ///
    /// Rules fire in a fixed order; a missing field skips its rule entirely
    /// rather than counting as zero.
    pub async fn analyze(&self, ticker: &str, store: &FactStore) -> Result<FundamentalRecord> {
        info!("Starting fundamental analysis for {ticker}...");

        let fact: RawFact = store
            .get_typed(&keys::raw_fact(ticker))
            .await?
            .ok_or_else(|| AnalysisError::NoData {
                ticker: ticker.to_string(),
            })?;

        let f = &fact.fundamentals;
        let mut score: f64 = 50.0;
        let mut findings = Vec::new();

        // P/E valuation
        if let Some(pe) = f.trailing_pe {
            if pe < 15.0 {
                score += 15.0;
                findings.push("Undervalued P/E ratio (< 15)".to_string());
            } else if pe > 30.0 {
                score -= 10.0;
                findings.push("High P/E ratio (> 30)".to_string());
            } else {
                score += 5.0;
                findings.push("Moderate P/E ratio".to_string());
            }
        }

        // Growth potential
        if let (Some(trailing), Some(forward)) = (f.trailing_pe, f.forward_pe) {
            if forward < trailing {
                score += 10.0;
                findings
                    .push("Forward P/E lower than Trailing P/E (Expected Growth)".to_string());
            }
        }

        // Dividend
        if let Some(dy) = f.dividend_yield {
            if dy > 0.02 {
                score += 10.0;
                findings.push(format!("Good Dividend Yield ({:.2}%)", dy * 100.0));
            }
        }

        // Market cap
        if let Some(cap) = f.market_cap {
            if cap > LARGE_CAP_THRESHOLD {
                score += 5.0;
                findings.push("Large Cap Company (Stability)".to_string());
            }
        }

        let record = FundamentalRecord {
            pe_ratio: f.trailing_pe,
            market_cap: f.market_cap,
            dividend_yield: f.dividend_yield,
            score: score.clamp(0.0, 100.0),
            findings,
        };

        store.set_typed(keys::fundamental(ticker), &record).await?;
        info!("Fundamental analysis completed for {ticker}");
        Ok(record)
    }
}

impl Default for FundamentalAnalyzerAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Stage for FundamentalAnalyzerAgent {
    async fn run(&self, ticker: &str, store: &FactStore) -> analyst_core::Result<serde_json::Value> {
        let record = self.analyze(ticker, store).await?;
        serde_json::to_value(&record)
            .map_err(|e| analyst_core::Error::ProcessingFailed(e.to_string()))
    }

    fn name(&self) -> &str {
        "FundamentalAnalyzerAgent"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::Fundamentals;

    async fn store_with_fundamentals(ticker: &str, fundamentals: Fundamentals) -> FactStore {
        let store = FactStore::new();
        let fact = RawFact {
            ticker: ticker.to_string(),
            fundamentals,
            ..Default::default()
        };
        store.set_typed(keys::raw_fact(ticker), &fact).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_missing_ticker_errors() {
        let agent = FundamentalAnalyzerAgent::new();
        let store = FactStore::new();

        let err = agent.analyze("MSFT", &store).await.unwrap_err();
        assert_eq!(err.to_string(), "No data found for MSFT");
    }

    #[tokio::test]
    async fn test_value_stock_scores_high() {
        let fundamentals = Fundamentals {
            trailing_pe: Some(12.0),
            forward_pe: Some(10.0),
            dividend_yield: Some(0.035),
            market_cap: Some(50e9),
            ..Default::default()
        };
        let agent = FundamentalAnalyzerAgent::new();
        let store = store_with_fundamentals("KO", fundamentals).await;

        let record = agent.analyze("KO", &store).await.unwrap();
        // 50 + 15 (cheap P/E) + 10 (growth) + 10 (dividend) + 5 (large cap)
        assert_eq!(record.score, 90.0);
        assert_eq!(
            record.findings,
            vec![
                "Undervalued P/E ratio (< 15)",
                "Forward P/E lower than Trailing P/E (Expected Growth)",
                "Good Dividend Yield (3.50%)",
                "Large Cap Company (Stability)",
            ]
        );
    }

    #[tokio::test]
    async fn test_expensive_stock_scores_low() {
        let fundamentals = Fundamentals {
            trailing_pe: Some(45.0),
            forward_pe: Some(50.0),
            ..Default::default()
        };
        let agent = FundamentalAnalyzerAgent::new();
        let store = store_with_fundamentals("HYPE", fundamentals).await;

        let record = agent.analyze("HYPE", &store).await.unwrap();
        assert_eq!(record.score, 40.0);
        assert_eq!(record.findings, vec!["High P/E ratio (> 30)"]);
    }

    #[tokio::test]
    async fn test_missing_fields_are_skipped_not_zero() {
        let agent = FundamentalAnalyzerAgent::new();
        let store = store_with_fundamentals("NEW", Fundamentals::default()).await;

        let record = agent.analyze("NEW", &store).await.unwrap();
        // No rule fires at all: the baseline survives untouched.
        assert_eq!(record.score, 50.0);
        assert!(record.findings.is_empty());
        assert!(record.pe_ratio.is_none());
    }

    #[tokio::test]
    async fn test_spec_fixture_scores_seventy() {
        let fundamentals = Fundamentals {
            trailing_pe: Some(25.0),
            forward_pe: Some(20.0),
            market_cap: Some(2e12),
            dividend_yield: Some(0.005),
            ..Default::default()
        };
        let agent = FundamentalAnalyzerAgent::new();
        let store = store_with_fundamentals("AAPL", fundamentals).await;

        let record = agent.analyze("AAPL", &store).await.unwrap();
        // 50 + 5 (moderate P/E) + 10 (growth) + 5 (large cap); the 0.5%
        // dividend yield is below the 2% bar.
        assert_eq!(record.score, 70.0);
    }

    #[tokio::test]
    async fn test_record_is_persisted() {
        let agent = FundamentalAnalyzerAgent::new();
        let store = store_with_fundamentals("AAPL", Fundamentals::default()).await;

        let record = agent.analyze("AAPL", &store).await.unwrap();
        let stored: FundamentalRecord = store
            .get_typed("fundamental_AAPL")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, record);
    }
}
