//! Raw market facts written by the fetch step
//!
//! Everything downstream of the fetcher reads these types out of the
//! [`FactStore`](analyst_core::FactStore) under ticker-scoped keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ticker-scoped store keys
pub mod keys {
    /// Raw fetched fact for a ticker
    pub fn raw_fact(ticker: &str) -> String {
        format!("data_{ticker}")
    }

    /// Technical stage record
    pub fn technical(ticker: &str) -> String {
        format!("technical_{ticker}")
    }

    /// Fundamental stage record
    pub fn fundamental(ticker: &str) -> String {
        format!("fundamental_{ticker}")
    }

    /// Sentiment stage record
    pub fn sentiment(ticker: &str) -> String {
        format!("sentiment_{ticker}")
    }

    /// Risk stage record
    pub fn risk(ticker: &str) -> String {
        format!("risk_{ticker}")
    }

    /// Final aggregated report
    pub fn report(ticker: &str) -> String {
        format!("report_{ticker}")
    }
}

/// One bar of a price series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Company fundamentals as reported by the data provider
///
/// Every field is optional: absence means the provider had no figure, which
/// downstream scoring treats as "insufficient data", never as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    pub market_cap: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub current_price: Option<f64>,
}

/// A single news item attached to a ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl NewsItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            publisher: None,
            link: None,
            published_at: None,
        }
    }
}

/// Everything the fetch step produces for one ticker
///
/// Written exactly once per run; both price series are ascending by
/// timestamp with no duplicates (the fetcher validates this). The hourly
/// series is carried for collaborators outside the core pipeline; the
/// stages themselves only consume daily closes and the fundamentals/news.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFact {
    pub ticker: String,
    pub history_daily: Vec<Candle>,
    pub history_hourly: Vec<Candle>,
    pub fundamentals: Fundamentals,
    pub news: Vec<NewsItem>,
}

impl RawFact {
    /// Closing prices of the daily series, in time order
    pub fn daily_closes(&self) -> Vec<f64> {
        self.history_daily.iter().map(|c| c.close).collect()
    }

    /// Check that a series is strictly ascending with no duplicate timestamps
    pub fn is_strictly_ordered(series: &[Candle]) -> bool {
        series.windows(2).all(|w| w[0].timestamp < w[1].timestamp)
    }

    /// Group fundamentals into a plain map for reporting
    pub fn fundamentals_map(&self) -> BTreeMap<String, serde_json::Value> {
        let mut map = BTreeMap::new();
        let f = &self.fundamentals;
        if let Some(v) = f.market_cap {
            map.insert("marketCap".to_string(), serde_json::json!(v));
        }
        if let Some(v) = f.trailing_pe {
            map.insert("trailingPE".to_string(), serde_json::json!(v));
        }
        if let Some(v) = f.forward_pe {
            map.insert("forwardPE".to_string(), serde_json::json!(v));
        }
        if let Some(v) = f.dividend_yield {
            map.insert("dividendYield".to_string(), serde_json::json!(v));
        }
        if let Some(v) = &f.sector {
            map.insert("sector".to_string(), serde_json::json!(v));
        }
        if let Some(v) = &f.industry {
            map.insert("industry".to_string(), serde_json::json!(v));
        }
        if let Some(v) = f.current_price {
            map.insert("currentPrice".to_string(), serde_json::json!(v));
        }
        map
    }
}
