//! Data fetching agent for raw market facts

use crate::cache::{CacheKey, FetchCache};
use crate::config::AnalystConfig;
use crate::error::{AnalysisError, Result};
use crate::facts::{RawFact, keys};
use analyst_core::FactStore;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Source of raw market facts for a ticker
///
/// The pipeline never talks to a data vendor directly; it consumes this
/// contract, so providers can be swapped or mocked per run.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch price history, fundamentals and news for one ticker
    async fn fetch(&self, ticker: &str) -> Result<RawFact>;
}

/// Default provider backed by Yahoo Finance, with optional Finnhub headlines
pub struct YahooProvider {
    yahoo: crate::api::YahooFinanceClient,
    news: Option<crate::api::NewsClient>,
    config: Arc<AnalystConfig>,
}

impl YahooProvider {
    /// Create a provider from the pipeline configuration
    pub fn new(config: Arc<AnalystConfig>) -> Self {
        let news = config
            .news_api_key
            .as_ref()
            .map(|key| crate::api::NewsClient::new(key.clone(), config.news_rate_limit));

        Self {
            yahoo: crate::api::YahooFinanceClient::new(),
            news,
            config,
        }
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn fetch(&self, ticker: &str) -> Result<RawFact> {
        let history_daily = self
            .yahoo
            .get_daily_history(ticker, self.config.daily_history_days)
            .await?;
        let history_hourly = self
            .yahoo
            .get_hourly_history(ticker, self.config.hourly_history_days)
            .await?;
        let fundamentals = self.yahoo.get_fundamentals(ticker).await?;

        let news = match &self.news {
            Some(client) => {
                let to = Utc::now().date_naive();
                let from = to - chrono::Duration::days(7);
                match client
                    .get_company_news(ticker, &from.to_string(), &to.to_string())
                    .await
                {
                    Ok(items) => items,
                    Err(e) => {
                        // Headlines are best-effort; fall back to Yahoo.
                        warn!("News API failed for {ticker}, falling back to Yahoo: {e}");
                        self.yahoo.get_news(ticker).await.unwrap_or_default()
                    }
                }
            }
            None => self.yahoo.get_news(ticker).await.unwrap_or_default(),
        };

        Ok(RawFact {
            ticker: ticker.to_string(),
            history_daily,
            history_hourly,
            fundamentals,
            news,
        })
    }
}

/// Agent that acquires the raw fact for a ticker and persists it
///
/// Writes `data_{ticker}` exactly once per run; every analysis stage reads
/// from that key. Fetches are cached so a re-run inside the TTL reuses the
/// previous fact.
pub struct DataFetcherAgent {
    provider: Arc<dyn MarketDataProvider>,
    cache: FetchCache,
}

impl DataFetcherAgent {
    /// Create a new data fetcher agent
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: &AnalystConfig) -> Self {
        Self {
            provider,
            cache: FetchCache::new(config.fetch_cache_ttl),
        }
    }

    /// Fetch all data for a ticker and store it under `data_{ticker}`
    pub async fn fetch_stock_data(&self, ticker: &str, store: &FactStore) -> Result<RawFact> {
        info!("Fetching data for {ticker}...");

        let key = CacheKey::new(ticker, "raw_fact");
        let provider = Arc::clone(&self.provider);
        let value = self
            .cache
            .get_or_fetch(key, || async move {
                let fact = provider.fetch(ticker).await?;
                validate_fact(&fact)?;
                serde_json::to_value(&fact).map_err(AnalysisError::from)
            })
            .await?;

        let fact: RawFact = serde_json::from_value(value.clone())?;
        store.set(keys::raw_fact(ticker), value).await;

        info!("Data fetched and saved for {ticker}");
        Ok(fact)
    }
}

/// Enforce the raw-fact invariant: both series strictly ascending by
/// timestamp with no duplicates
fn validate_fact(fact: &RawFact) -> Result<()> {
    if !RawFact::is_strictly_ordered(&fact.history_daily) {
        return Err(AnalysisError::Fetch(format!(
            "daily price series for {} is not strictly time-ordered",
            fact.ticker
        )));
    }
    if !RawFact::is_strictly_ordered(&fact.history_hourly) {
        return Err(AnalysisError::Fetch(format!(
            "hourly price series for {} is not strictly time-ordered",
            fact.ticker
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::Candle;
    use chrono::TimeZone;

    fn candle(ts_secs: i64, close: f64) -> Candle {
        Candle {
            timestamp: Utc.timestamp_opt(ts_secs, 0).single().expect("valid ts"),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    fn fact_with_daily(candles: Vec<Candle>) -> RawFact {
        RawFact {
            ticker: "AAPL".to_string(),
            history_daily: candles,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_persists_raw_fact() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(fact_with_daily(vec![candle(0, 1.0), candle(86_400, 2.0)])));

        let agent = DataFetcherAgent::new(Arc::new(provider), &AnalystConfig::default());
        let store = FactStore::new();

        let fact = agent.fetch_stock_data("AAPL", &store).await.unwrap();
        assert_eq!(fact.ticker, "AAPL");

        let stored: RawFact = store.get_typed("data_AAPL").await.unwrap().unwrap();
        assert_eq!(stored, fact);
    }

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(fact_with_daily(vec![candle(0, 1.0)])));

        let agent = DataFetcherAgent::new(Arc::new(provider), &AnalystConfig::default());
        let store = FactStore::new();

        agent.fetch_stock_data("AAPL", &store).await.unwrap();
        // The mock would panic on a second provider call.
        agent.fetch_stock_data("AAPL", &store).await.unwrap();
    }

    #[tokio::test]
    async fn test_unordered_series_is_rejected() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_fetch()
            .returning(|_| Ok(fact_with_daily(vec![candle(86_400, 1.0), candle(0, 2.0)])));

        let agent = DataFetcherAgent::new(Arc::new(provider), &AnalystConfig::default());
        let store = FactStore::new();

        let err = agent.fetch_stock_data("AAPL", &store).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Fetch(_)));
        assert!(!store.contains_key("data_AAPL").await);
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_fetch()
            .returning(|_| Err(AnalysisError::YahooFinance("no quotes".to_string())));

        let agent = DataFetcherAgent::new(Arc::new(provider), &AnalystConfig::default());
        let store = FactStore::new();

        assert!(agent.fetch_stock_data("AAPL", &store).await.is_err());
        assert!(store.is_empty().await);
    }
}
