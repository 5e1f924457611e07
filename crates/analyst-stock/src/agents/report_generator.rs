//! Report generation: merges the four stage records into one recommendation

use crate::error::{AnalysisError, Result};
use crate::facts::keys;
use crate::report::{
    FundamentalRecord, Recommendation, Report, RiskRecord, SentimentRecord, TechnicalRecord,
};
use analyst_core::FactStore;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

const TECHNICAL_WEIGHT: f64 = 0.30;
const FUNDAMENTAL_WEIGHT: f64 = 0.40;
const SENTIMENT_WEIGHT: f64 = 0.15;
const RISK_WEIGHT: f64 = 0.15;

/// Aggregator reading all four stage records and producing the final report
///
/// Fail-closed: if any record is missing the whole run fails; a partial
/// report is never produced.
pub struct ReportGeneratorAgent;

impl ReportGeneratorAgent {
    /// Create a new report generator
    pub fn new() -> Self {
        Self
    }

    /// Build the weighted report for a ticker and persist it
    pub async fn generate_report(&self, ticker: &str, store: &FactStore) -> Result<Report> {
        info!("Generating report for {ticker}...");

        let technical: Option<TechnicalRecord> = store.get_typed(&keys::technical(ticker)).await?;
        let fundamental: Option<FundamentalRecord> =
            store.get_typed(&keys::fundamental(ticker)).await?;
        let sentiment: Option<SentimentRecord> = store.get_typed(&keys::sentiment(ticker)).await?;
        let risk: Option<RiskRecord> = store.get_typed(&keys::risk(ticker)).await?;

        let (Some(technical), Some(fundamental), Some(sentiment), Some(risk)) =
            (technical, fundamental, sentiment, risk)
        else {
            return Err(AnalysisError::Incomplete);
        };

        let risk_quality = risk.risk_level.quality_score();
        let overall_score = round2(
            technical.score * TECHNICAL_WEIGHT
                + fundamental.score * FUNDAMENTAL_WEIGHT
                + sentiment.sentiment_score * SENTIMENT_WEIGHT
                + risk_quality * RISK_WEIGHT,
        );
        let overall_rating = Recommendation::from_score(overall_score);

        let summary = build_summary(
            ticker,
            overall_rating,
            overall_score,
            &technical,
            &fundamental,
            &sentiment,
            &risk,
        );

        let report = Report {
            ticker: ticker.to_string(),
            run_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            overall_rating,
            overall_score,
            technical_analysis: technical,
            fundamental_analysis: fundamental,
            sentiment_analysis: sentiment,
            risk_assessment: risk,
            summary,
        };

        store.set_typed(keys::report(ticker), &report).await?;
        info!("Report generated for {ticker}");
        Ok(report)
    }
}

impl Default for ReportGeneratorAgent {
    fn default() -> Self {
        Self::new()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn build_summary(
    ticker: &str,
    recommendation: Recommendation,
    score: f64,
    technical: &TechnicalRecord,
    fundamental: &FundamentalRecord,
    sentiment: &SentimentRecord,
    risk: &RiskRecord,
) -> String {
    let pe = fundamental
        .pe_ratio
        .map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"));
    let first_signal = technical.signals.first().map_or("", String::as_str);
    let first_finding = fundamental.findings.first().map_or("", String::as_str);

    format!(
        "Investment Report for {ticker}:\n\
         Recommendation: {recommendation} (Score: {score:.2}/100)\n\
         Risk Level: {}\n\
         Technical Outlook: RSI at {:.2}, {first_signal}\n\
         Fundamental: P/E {pe}, {first_finding}\n\
         Sentiment: Score {:.2} based on {} articles.",
        risk.risk_level, technical.rsi, sentiment.sentiment_score, sentiment.article_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Headline, RiskLevel};

    fn technical(score: f64) -> TechnicalRecord {
        TechnicalRecord {
            rsi: 55.0,
            macd: 1.0,
            macd_signal: 1.0,
            sma_50: 100.0,
            sma_200: 95.0,
            bb_upper: 110.0,
            bb_lower: 90.0,
            signals: vec!["RSI Neutral".to_string()],
            score,
        }
    }

    fn fundamental(score: f64) -> FundamentalRecord {
        FundamentalRecord {
            pe_ratio: Some(18.0),
            market_cap: Some(50e9),
            dividend_yield: None,
            score,
            findings: vec!["Moderate P/E ratio".to_string()],
        }
    }

    fn sentiment(score: f64) -> SentimentRecord {
        SentimentRecord {
            sentiment_score: score,
            confidence: 0.3,
            article_count: 3,
            top_headlines: vec![Headline {
                title: "Quarterly results".to_string(),
                polarity: 0.0,
            }],
            summary: None,
        }
    }

    fn risk(level: RiskLevel) -> RiskRecord {
        RiskRecord {
            annualized_volatility: 0.2,
            max_drawdown: -0.1,
            risk_level: level,
        }
    }

    async fn seeded_store(
        ticker: &str,
        t: f64,
        f: f64,
        s: f64,
        level: RiskLevel,
    ) -> FactStore {
        let store = FactStore::new();
        store
            .set_typed(keys::technical(ticker), &technical(t))
            .await
            .unwrap();
        store
            .set_typed(keys::fundamental(ticker), &fundamental(f))
            .await
            .unwrap();
        store
            .set_typed(keys::sentiment(ticker), &sentiment(s))
            .await
            .unwrap();
        store
            .set_typed(keys::risk(ticker), &risk(level))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_missing_record_fails_closed() {
        let agent = ReportGeneratorAgent::new();
        let store = seeded_store("AAPL", 60.0, 70.0, 50.0, RiskLevel::Low).await;
        store.clear().await;

        let err = agent.generate_report("AAPL", &store).await.unwrap_err();
        assert_eq!(err.to_string(), "Incomplete analysis data");
        assert!(!store.contains_key("report_AAPL").await);
    }

    #[tokio::test]
    async fn test_one_missing_record_is_enough_to_fail() {
        let agent = ReportGeneratorAgent::new();
        let store = FactStore::new();
        store
            .set_typed(keys::technical("AAPL"), &technical(60.0))
            .await
            .unwrap();
        store
            .set_typed(keys::fundamental("AAPL"), &fundamental(70.0))
            .await
            .unwrap();
        store
            .set_typed(keys::sentiment("AAPL"), &sentiment(50.0))
            .await
            .unwrap();

        // Three of four records present: still no report.
        let err = agent.generate_report("AAPL", &store).await.unwrap_err();
        assert_eq!(err.to_string(), "Incomplete analysis data");
    }

    #[tokio::test]
    async fn test_weighted_score_and_persistence() {
        let agent = ReportGeneratorAgent::new();
        let store = seeded_store("AAPL", 60.0, 70.0, 50.0, RiskLevel::Low).await;

        let report = agent.generate_report("AAPL", &store).await.unwrap();
        // 0.30*60 + 0.40*70 + 0.15*50 + 0.15*100 = 68.5
        assert_eq!(report.overall_score, 68.5);
        assert_eq!(report.overall_rating, Recommendation::Hold);

        let stored: Report = store.get_typed("report_AAPL").await.unwrap().unwrap();
        assert_eq!(stored, report);
    }

    #[tokio::test]
    async fn test_risk_quality_inversion() {
        let agent = ReportGeneratorAgent::new();

        let low = seeded_store("A", 50.0, 50.0, 50.0, RiskLevel::Low).await;
        let high = seeded_store("B", 50.0, 50.0, 50.0, RiskLevel::High).await;

        let low_score = agent.generate_report("A", &low).await.unwrap().overall_score;
        let high_score = agent.generate_report("B", &high).await.unwrap().overall_score;

        // Low risk blends 100, high risk blends 30: a 10.5 point spread.
        assert_eq!(low_score - high_score, 10.5);
    }

    #[tokio::test]
    async fn test_overall_score_is_monotone_in_each_input() {
        let agent = ReportGeneratorAgent::new();
        let base = seeded_store("BASE", 50.0, 50.0, 50.0, RiskLevel::Medium).await;
        let base_score = agent
            .generate_report("BASE", &base)
            .await
            .unwrap()
            .overall_score;

        for (t, f, s) in [(70.0, 50.0, 50.0), (50.0, 70.0, 50.0), (50.0, 50.0, 70.0)] {
            let store = seeded_store("X", t, f, s, RiskLevel::Medium).await;
            let score = agent.generate_report("X", &store).await.unwrap().overall_score;
            assert!(score > base_score);
        }

        let better_risk = seeded_store("Y", 50.0, 50.0, 50.0, RiskLevel::Low).await;
        let score = agent
            .generate_report("Y", &better_risk)
            .await
            .unwrap()
            .overall_score;
        assert!(score > base_score);
    }

    #[tokio::test]
    async fn test_extreme_scores_hit_outer_bands() {
        let agent = ReportGeneratorAgent::new();

        let bullish = seeded_store("UP", 95.0, 95.0, 95.0, RiskLevel::Low).await;
        let report = agent.generate_report("UP", &bullish).await.unwrap();
        assert_eq!(report.overall_rating, Recommendation::StrongBuy);

        let bearish = seeded_store("DOWN", 5.0, 5.0, 5.0, RiskLevel::High).await;
        let report = agent.generate_report("DOWN", &bearish).await.unwrap();
        assert_eq!(report.overall_rating, Recommendation::StrongSell);
    }

    #[tokio::test]
    async fn test_summary_contents() {
        let agent = ReportGeneratorAgent::new();
        let store = seeded_store("AAPL", 60.0, 70.0, 50.0, RiskLevel::Low).await;

        let report = agent.generate_report("AAPL", &store).await.unwrap();
        assert!(report.summary.contains("Investment Report for AAPL"));
        assert!(report.summary.contains("Recommendation: HOLD (Score: 68.50/100)"));
        assert!(report.summary.contains("Risk Level: Low"));
        assert!(report.summary.contains("P/E 18.00"));
        assert!(report.summary.contains("based on 3 articles."));
    }
}
