//! News sentiment analysis stage

use crate::error::{AnalysisError, Result};
use crate::facts::{RawFact, keys};
use crate::report::{Headline, SentimentRecord};
use crate::sentiment::SentimentScorer;
use analyst_core::{FactStore, Stage};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

const TOP_HEADLINES: usize = 3;

/// Stage averaging headline polarity into a sentiment score
pub struct SentimentAnalyzerAgent {
    scorer: Arc<dyn SentimentScorer>,
}

impl SentimentAnalyzerAgent {
    /// Create a new sentiment analyzer with the given scoring collaborator
    pub fn new(scorer: Arc<dyn SentimentScorer>) -> Self {
        Self { scorer }
    }

    /// Score the ticker's news and persist the sentiment record
    pub async fn analyze(&self, ticker: &str, store: &FactStore) -> Result<SentimentRecord> {
        info!("Starting sentiment analysis for {ticker}...");

        let fact: RawFact = store
            .get_typed(&keys::raw_fact(ticker))
            .await?
            .ok_or_else(|| AnalysisError::NoData {
                ticker: ticker.to_string(),
            })?;

        let record = if fact.news.is_empty() {
            SentimentRecord::no_news_fallback()
        } else {
            let mut total_polarity = 0.0;
            let mut headlines = Vec::new();

            for item in &fact.news {
                if item.title.is_empty() {
                    continue;
                }
                let polarity = self.scorer.polarity(&item.title);
                total_polarity += polarity;
                headlines.push(Headline {
                    title: item.title.clone(),
                    polarity,
                });
            }

            let count = headlines.len();
            let avg_polarity = if count > 0 {
                total_polarity / count as f64
            } else {
                0.0
            };

            // Polarity lives in [-1, 1]; map it onto the 0..100 score scale.
            let sentiment_score = (avg_polarity + 1.0) * 50.0;
            let confidence = (count as f64 * 0.1).min(1.0);
            headlines.truncate(TOP_HEADLINES);

            SentimentRecord {
                sentiment_score,
                confidence,
                article_count: count,
                top_headlines: headlines,
                summary: None,
            }
        };

        store.set_typed(keys::sentiment(ticker), &record).await?;
        info!("Sentiment analysis completed for {ticker}");
        Ok(record)
    }
}

#[async_trait]
impl Stage for SentimentAnalyzerAgent {
    async fn run(&self, ticker: &str, store: &FactStore) -> analyst_core::Result<serde_json::Value> {
        let record = self.analyze(ticker, store).await?;
        serde_json::to_value(&record)
            .map_err(|e| analyst_core::Error::ProcessingFailed(e.to_string()))
    }

    fn name(&self) -> &str {
        "SentimentAnalyzerAgent"
    }
}
