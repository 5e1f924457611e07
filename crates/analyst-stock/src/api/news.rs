//! News API client for ticker headlines

use crate::error::{AnalysisError, Result};
use crate::facts::NewsItem;
use chrono::DateTime;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const DEFAULT_RATE_LIMIT: u32 = 60;

/// Finnhub company-news article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    /// Article category
    pub category: String,
    /// Publish time (UNIX timestamp)
    pub datetime: i64,
    /// News headline
    pub headline: String,
    /// Unique article ID
    pub id: i64,
    /// News source
    pub source: String,
    /// Article summary
    pub summary: String,
    /// Article URL
    pub url: String,
}

impl NewsArticle {
    /// Convert the article into the pipeline's news item shape
    pub fn into_news_item(self) -> NewsItem {
        NewsItem {
            title: self.headline,
            publisher: Some(self.source),
            link: Some(self.url),
            published_at: DateTime::from_timestamp(self.datetime, 0),
        }
    }
}

/// Finnhub client for company headlines, with client-side rate limiting
pub struct NewsClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl NewsClient {
    /// Create a new news client
    ///
    /// # Arguments
    /// * `api_key` - Finnhub API key
    /// * `rate_limit` - Requests per minute (free tier: 60)
    pub fn new(api_key: impl Into<String>, rate_limit: u32) -> Self {
        let per_minute = NonZeroU32::new(rate_limit)
            .or(NonZeroU32::new(DEFAULT_RATE_LIMIT))
            .unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));

        Self {
            client: Client::new(),
            api_key: api_key.into(),
            rate_limiter,
        }
    }

    /// Get company news for a ticker
    ///
    /// # Arguments
    /// * `ticker` - Stock ticker (e.g., "AAPL")
    /// * `from` - Start date (YYYY-MM-DD)
    /// * `to` - End date (YYYY-MM-DD)
    pub async fn get_company_news(
        &self,
        ticker: &str,
        from: &str,
        to: &str,
    ) -> Result<Vec<NewsItem>> {
        self.rate_limiter.until_ready().await;

        let url = format!(
            "https://finnhub.io/api/v1/company-news?symbol={}&from={}&to={}&token={}",
            ticker, from, to, self.api_key
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AnalysisError::Api(format!("Finnhub request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Api(format!(
                "Finnhub API error {status}: {body}"
            )));
        }

        let articles = response
            .json::<Vec<NewsArticle>>()
            .await
            .map_err(|e| AnalysisError::Api(format!("Failed to parse Finnhub response: {e}")))?;

        Ok(articles
            .into_iter()
            .map(NewsArticle::into_news_item)
            .collect())
    }
}
