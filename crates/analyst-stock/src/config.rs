//! Configuration for analysis runs

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for an analysis pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalystConfig {
    /// Calendar days of daily history to fetch (default one year)
    pub daily_history_days: i64,

    /// Calendar days of hourly history to fetch (default three months)
    pub hourly_history_days: i64,

    /// Run the four analysis stages concurrently instead of sequentially
    pub parallel_stages: bool,

    /// TTL for cached raw facts
    pub fetch_cache_ttl: Duration,

    /// Request timeout for external APIs
    pub request_timeout: Duration,

    /// News API requests per minute
    pub news_rate_limit: u32,

    /// Finnhub API key (optional; Yahoo headlines are used when absent)
    pub news_api_key: Option<String>,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            daily_history_days: 365,
            hourly_history_days: 90,
            parallel_stages: false,
            fetch_cache_ttl: Duration::from_secs(300),
            request_timeout: Duration::from_secs(30),
            news_rate_limit: 60,
            news_api_key: None,
        }
    }
}

impl AnalystConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnalystConfigBuilder {
        AnalystConfigBuilder::default()
    }

    /// Load the news API key from the environment
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var("FINNHUB_API_KEY") {
            self.news_api_key = Some(key);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.daily_history_days <= 0 {
            return Err(AnalysisError::Config(
                "daily_history_days must be positive".to_string(),
            ));
        }

        if self.hourly_history_days <= 0 {
            return Err(AnalysisError::Config(
                "hourly_history_days must be positive".to_string(),
            ));
        }

        if self.news_rate_limit == 0 {
            return Err(AnalysisError::Config(
                "news_rate_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for AnalystConfig
#[derive(Debug, Default)]
pub struct AnalystConfigBuilder {
    daily_history_days: Option<i64>,
    hourly_history_days: Option<i64>,
    parallel_stages: Option<bool>,
    fetch_cache_ttl: Option<Duration>,
    request_timeout: Option<Duration>,
    news_rate_limit: Option<u32>,
    news_api_key: Option<String>,
}

impl AnalystConfigBuilder {
    /// Set the daily history window in days
    pub fn daily_history_days(mut self, days: i64) -> Self {
        self.daily_history_days = Some(days);
        self
    }

    /// Set the hourly history window in days
    pub fn hourly_history_days(mut self, days: i64) -> Self {
        self.hourly_history_days = Some(days);
        self
    }

    /// Run stages concurrently
    pub fn parallel_stages(mut self, parallel: bool) -> Self {
        self.parallel_stages = Some(parallel);
        self
    }

    /// Set the fetch cache TTL
    pub fn fetch_cache_ttl(mut self, ttl: Duration) -> Self {
        self.fetch_cache_ttl = Some(ttl);
        self
    }

    /// Set the request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the news API rate limit (requests per minute)
    pub fn news_rate_limit(mut self, limit: u32) -> Self {
        self.news_rate_limit = Some(limit);
        self
    }

    /// Set the news API key
    pub fn news_api_key(mut self, key: impl Into<String>) -> Self {
        self.news_api_key = Some(key.into());
        self
    }

    /// Load the news API key from the environment
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var("FINNHUB_API_KEY") {
            self.news_api_key = Some(key);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AnalystConfig> {
        let defaults = AnalystConfig::default();

        let config = AnalystConfig {
            daily_history_days: self.daily_history_days.unwrap_or(defaults.daily_history_days),
            hourly_history_days: self
                .hourly_history_days
                .unwrap_or(defaults.hourly_history_days),
            parallel_stages: self.parallel_stages.unwrap_or(defaults.parallel_stages),
            fetch_cache_ttl: self.fetch_cache_ttl.unwrap_or(defaults.fetch_cache_ttl),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            news_rate_limit: self.news_rate_limit.unwrap_or(defaults.news_rate_limit),
            news_api_key: self.news_api_key,
        };

        config.validate()?;
        Ok(config)
    }
}
