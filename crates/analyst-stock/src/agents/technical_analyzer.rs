//! Technical analysis stage

use crate::error::{AnalysisError, Result};
use crate::facts::{RawFact, keys};
use crate::indicators;
use crate::report::TechnicalRecord;
use analyst_core::{FactStore, Stage};
use async_trait::async_trait;
use tracing::info;

const RSI_PERIOD: usize = 14;
const BB_PERIOD: usize = 20;
const BB_K: f64 = 2.0;

/// Stage deriving indicator-based signals and a technical score
pub struct TechnicalAnalyzerAgent;

impl TechnicalAnalyzerAgent {
    /// Create a new technical analyzer
    pub fn new() -> Self {
        Self
    }

    /// Analyze the daily close series and persist the technical record
    pub async fn analyze(&self, ticker: &str, store: &FactStore) -> Result<TechnicalRecord> {
        info!("Starting technical analysis for {ticker}...");

        let fact: RawFact = store
            .get_typed(&keys::raw_fact(ticker))
            .await?
            .ok_or_else(|| AnalysisError::NoData {
                ticker: ticker.to_string(),
            })?;

        let closes = fact.daily_closes();
        let Some(&last_close) = closes.last() else {
            return Err(AnalysisError::Computation(format!(
                "empty daily price series for {ticker}"
            )));
        };

        let rsi = indicators::rsi(&closes, RSI_PERIOD);
        let (macd, macd_signal) = indicators::macd(&closes);
        let sma_50 = indicators::sma(&closes, 50);
        let sma_200 = indicators::sma(&closes, 200);
        let (bb_upper, bb_lower) = indicators::bollinger(&closes, BB_PERIOD, BB_K);

        let signals = classify_signals(rsi, last_close, sma_200, macd, macd_signal);
        let score = technical_score(rsi, last_close, sma_200, macd, macd_signal);

        let record = TechnicalRecord {
            rsi,
            macd,
            macd_signal,
            sma_50,
            sma_200,
            bb_upper,
            bb_lower,
            signals,
            score,
        };

        store.set_typed(keys::technical(ticker), &record).await?;
        info!("Technical analysis completed for {ticker}");
        Ok(record)
    }
}

impl Default for TechnicalAnalyzerAgent {
    fn default() -> Self {
        Self::new()
    }
}

/// Classification signals in fixed order: RSI, trend, momentum
fn classify_signals(rsi: f64, price: f64, sma_200: f64, macd: f64, macd_signal: f64) -> Vec<String> {
    let mut signals = Vec::with_capacity(3);

    if rsi < 30.0 {
        signals.push("RSI Oversold (Buy Signal)".to_string());
    } else if rsi > 70.0 {
        signals.push("RSI Overbought (Sell Signal)".to_string());
    } else {
        signals.push("RSI Neutral".to_string());
    }

    if price > sma_200 {
        signals.push("Price above 200 SMA (Bullish Trend)".to_string());
    } else {
        signals.push("Price below 200 SMA (Bearish Trend)".to_string());
    }

    if macd > macd_signal {
        signals.push("MACD Bullish Crossover".to_string());
    } else {
        signals.push("MACD Bearish".to_string());
    }

    signals
}

/// Ordered score rules; the rule order is part of the contract
fn technical_score(rsi: f64, price: f64, sma_200: f64, macd: f64, macd_signal: f64) -> f64 {
    let mut score: f64 = 50.0;

    // RSI contribution
    if (30.0..=70.0).contains(&rsi) {
        score += 10.0;
    }
    if rsi < 30.0 {
        score += 20.0; // Oversold bounce potential
    }
    if rsi > 70.0 {
        score -= 10.0; // Overbought risk
    }

    // Trend contribution
    if price > sma_200 {
        score += 20.0;
    } else {
        score -= 20.0;
    }

    // Momentum contribution
    if macd > macd_signal {
        score += 10.0;
    }

    score.clamp(0.0, 100.0)
}

#[async_trait]
impl Stage for TechnicalAnalyzerAgent {
    async fn run(&self, ticker: &str, store: &FactStore) -> analyst_core::Result<serde_json::Value> {
        let record = self.analyze(ticker, store).await?;
        serde_json::to_value(&record)
            .map_err(|e| analyst_core::Error::ProcessingFailed(e.to_string()))
    }

    fn name(&self) -> &str {
        "TechnicalAnalyzerAgent"
    }
}
