//! Yahoo Finance API client

use crate::error::{AnalysisError, Result};
use crate::facts::{Candle, Fundamentals, NewsItem};
use chrono::{DateTime, Utc};
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

/// Yahoo Finance API client
pub struct YahooFinanceClient {}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self {}
    }

    /// Get daily candles covering the trailing `days`
    pub async fn get_daily_history(&self, ticker: &str, days: i64) -> Result<Vec<Candle>> {
        let end = Utc::now();
        let start = end - chrono::Duration::days(days);
        self.get_history(ticker, start, end, "1d").await
    }

    /// Get hourly candles covering the trailing `days`
    pub async fn get_hourly_history(&self, ticker: &str, days: i64) -> Result<Vec<Candle>> {
        let end = Utc::now();
        let start = end - chrono::Duration::days(days);
        self.get_history(ticker, start, end, "1h").await
    }

    async fn get_history(
        &self,
        ticker: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: &str,
    ) -> Result<Vec<Candle>> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| AnalysisError::YahooFinance(e.to_string()))?;

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| AnalysisError::YahooFinance(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| AnalysisError::YahooFinance(format!("Invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history_interval(ticker, start_odt, end_odt, interval)
            .await
            .map_err(|e| AnalysisError::YahooFinance(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| AnalysisError::YahooFinance(e.to_string()))?;

        Ok(quotes
            .iter()
            .map(|q| Candle {
                timestamp: DateTime::from_timestamp(q.timestamp as i64, 0)
                    .unwrap_or_else(Utc::now),
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
            })
            .collect())
    }

    /// Get fundamentals for a ticker
    ///
    /// The Yahoo chart API exposes little beyond the latest price; fields it
    /// cannot provide stay `None` and are skipped by downstream scoring.
    pub async fn get_fundamentals(&self, ticker: &str) -> Result<Fundamentals> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| AnalysisError::YahooFinance(e.to_string()))?;

        let response = provider
            .get_latest_quotes(ticker, "1d")
            .await
            .map_err(|e| AnalysisError::YahooFinance(e.to_string()))?;

        let current_price = response.last_quote().ok().map(|q| q.close);

        Ok(Fundamentals {
            current_price,
            ..Default::default()
        })
    }

    /// Get recent news headlines for a ticker via the search endpoint
    pub async fn get_news(&self, ticker: &str) -> Result<Vec<NewsItem>> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| AnalysisError::YahooFinance(e.to_string()))?;

        let result = provider
            .search_ticker(ticker)
            .await
            .map_err(|e| AnalysisError::YahooFinance(e.to_string()))?;

        Ok(result
            .news
            .into_iter()
            .map(|item| NewsItem {
                title: item.title,
                publisher: Some(item.publisher),
                link: Some(item.link),
                published_at: DateTime::from_timestamp(item.provider_publish_time as i64, 0),
            })
            .collect())
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}
