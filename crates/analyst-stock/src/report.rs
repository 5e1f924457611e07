//! Stage records and the final aggregated report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Output of the technical stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalRecord {
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub sma_50: f64,
    pub sma_200: f64,
    pub bb_upper: f64,
    pub bb_lower: f64,
    /// Classification signals in evaluation order: RSI, trend, momentum
    pub signals: Vec<String>,
    pub score: f64,
}

/// Output of the fundamental stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalRecord {
    pub pe_ratio: Option<f64>,
    pub market_cap: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub score: f64,
    pub findings: Vec<String>,
}

/// One scored headline retained in the sentiment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub polarity: f64,
}

/// Output of the sentiment stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub sentiment_score: f64,
    pub confidence: f64,
    pub article_count: usize,
    pub top_headlines: Vec<Headline>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl SentimentRecord {
    /// Fixed record produced when the ticker has no news at all
    pub fn no_news_fallback() -> Self {
        Self {
            sentiment_score: 50.0,
            confidence: 0.0,
            article_count: 0,
            top_headlines: Vec::new(),
            summary: Some("No news found".to_string()),
        }
    }
}

/// Risk classification derived from annualized volatility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classify annualized volatility into a risk level
    pub fn from_volatility(annualized_volatility: f64) -> Self {
        if annualized_volatility > 0.30 {
            Self::High
        } else if annualized_volatility > 0.15 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Invert risk into a quality score for blending with the other stages
    pub fn quality_score(self) -> f64 {
        match self {
            Self::Low => 100.0,
            Self::Medium => 60.0,
            Self::High => 30.0,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Output of the risk stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRecord {
    pub annualized_volatility: f64,
    pub max_drawdown: f64,
    pub risk_level: RiskLevel,
}

/// Recommendation band derived from the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "STRONG SELL")]
    StrongSell,
}

impl Recommendation {
    /// Map an overall score to its band
    ///
    /// Thresholds are checked in override order: the narrower band wins
    /// when a score satisfies more than one (86 is STRONG BUY, not BUY;
    /// 24 is STRONG SELL, not SELL). Boundary scores fall to the wider
    /// band: 85.0 is BUY, 25.0 is SELL, 40.0 is HOLD.
    pub fn from_score(score: f64) -> Self {
        if score > 85.0 {
            Self::StrongBuy
        } else if score > 70.0 {
            Self::Buy
        } else if score < 25.0 {
            Self::StrongSell
        } else if score < 40.0 {
            Self::Sell
        } else {
            Self::Hold
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StrongBuy => write!(f, "STRONG BUY"),
            Self::Buy => write!(f, "BUY"),
            Self::Hold => write!(f, "HOLD"),
            Self::Sell => write!(f, "SELL"),
            Self::StrongSell => write!(f, "STRONG SELL"),
        }
    }
}

/// Final report assembled by the aggregator
///
/// Only built when all four stage records exist; a partial report is never
/// produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub ticker: String,
    pub run_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub overall_rating: Recommendation,
    pub overall_score: f64,
    pub technical_analysis: TechnicalRecord,
    pub fundamental_analysis: FundamentalRecord,
    pub sentiment_analysis: SentimentRecord,
    pub risk_assessment: RiskRecord,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_thresholds() {
        assert_eq!(RiskLevel::from_volatility(0.05), RiskLevel::Low);
        assert_eq!(RiskLevel::from_volatility(0.15), RiskLevel::Low);
        assert_eq!(RiskLevel::from_volatility(0.1501), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_volatility(0.30), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_volatility(0.31), RiskLevel::High);
    }

    #[test]
    fn test_risk_quality_lookup() {
        assert_eq!(RiskLevel::Low.quality_score(), 100.0);
        assert_eq!(RiskLevel::Medium.quality_score(), 60.0);
        assert_eq!(RiskLevel::High.quality_score(), 30.0);
    }

    #[test]
    fn test_recommendation_boundaries() {
        assert_eq!(Recommendation::from_score(85.0), Recommendation::Buy);
        assert_eq!(Recommendation::from_score(85.01), Recommendation::StrongBuy);
        assert_eq!(Recommendation::from_score(70.01), Recommendation::Buy);
        assert_eq!(Recommendation::from_score(70.0), Recommendation::Hold);
        assert_eq!(Recommendation::from_score(40.0), Recommendation::Hold);
        assert_eq!(Recommendation::from_score(39.99), Recommendation::Sell);
        assert_eq!(Recommendation::from_score(25.0), Recommendation::Sell);
        assert_eq!(Recommendation::from_score(24.99), Recommendation::StrongSell);
        assert_eq!(Recommendation::from_score(0.0), Recommendation::StrongSell);
        assert_eq!(Recommendation::from_score(100.0), Recommendation::StrongBuy);
    }

    #[test]
    fn test_recommendation_serializes_as_band_name() {
        let json = serde_json::to_string(&Recommendation::StrongBuy).expect("serialize");
        assert_eq!(json, "\"STRONG BUY\"");

        let back: Recommendation = serde_json::from_str("\"HOLD\"").expect("deserialize");
        assert_eq!(back, Recommendation::Hold);
    }

    #[test]
    fn test_no_news_fallback() {
        let record = SentimentRecord::no_news_fallback();
        assert_eq!(record.sentiment_score, 50.0);
        assert_eq!(record.confidence, 0.0);
        assert_eq!(record.article_count, 0);
        assert_eq!(record.summary.as_deref(), Some("No news found"));
    }
}
