//! Analysis workflow orchestration
//!
//! The orchestrator sequences fetch, the four analysis stages and the final
//! aggregation. All data flows through the shared `FactStore`; the stages
//! never feed each other through return values, so any of them can be
//! re-run, mocked or replaced independently.
//!
//! Failure policy: best-effort fan-out, fail-closed at merge. A fetch
//! failure aborts the run before any stage executes. A single stage failure
//! is logged and does not abort its siblings, but the aggregator refuses to
//! build a report from fewer than four records, so the run still surfaces
//! an error at merge time.

use crate::agents::{
    DataFetcherAgent, FundamentalAnalyzerAgent, MarketDataProvider, ReportGeneratorAgent,
    RiskAnalyzerAgent, SentimentAnalyzerAgent, TechnicalAnalyzerAgent,
};
use crate::config::AnalystConfig;
use crate::error::{AnalysisError, Result};
use crate::report::Report;
use crate::sentiment::{LexiconScorer, SentimentScorer};
use analyst_core::{FactStore, Stage};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Workflow state of one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Fetching,
    Analyzing,
    Aggregating,
    Done,
    Error,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetching => write!(f, "FETCHING"),
            Self::Analyzing => write!(f, "ANALYZING"),
            Self::Aggregating => write!(f, "AGGREGATING"),
            Self::Done => write!(f, "DONE"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Coordinates the full per-ticker analysis workflow
pub struct Orchestrator {
    store: Arc<FactStore>,
    fetcher: DataFetcherAgent,
    stages: Vec<Arc<dyn Stage>>,
    reporter: ReportGeneratorAgent,
    parallel: bool,
}

impl Orchestrator {
    /// Create an orchestrator with the default lexicon sentiment scorer
    pub fn new(
        store: Arc<FactStore>,
        provider: Arc<dyn MarketDataProvider>,
        config: Arc<AnalystConfig>,
    ) -> Self {
        Self::with_scorer(store, provider, Arc::new(LexiconScorer::new()), config)
    }

    /// Create an orchestrator with a custom sentiment scoring collaborator
    pub fn with_scorer(
        store: Arc<FactStore>,
        provider: Arc<dyn MarketDataProvider>,
        scorer: Arc<dyn SentimentScorer>,
        config: Arc<AnalystConfig>,
    ) -> Self {
        let stages: Vec<Arc<dyn Stage>> = vec![
            Arc::new(TechnicalAnalyzerAgent::new()),
            Arc::new(FundamentalAnalyzerAgent::new()),
            Arc::new(SentimentAnalyzerAgent::new(scorer)),
            Arc::new(RiskAnalyzerAgent::new()),
        ];

        Self {
            store,
            fetcher: DataFetcherAgent::new(provider, &config),
            stages,
            reporter: ReportGeneratorAgent::new(),
            parallel: config.parallel_stages,
        }
    }

    /// The store backing this orchestrator's runs
    pub fn store(&self) -> &Arc<FactStore> {
        &self.store
    }

    /// Run the full analysis workflow for one ticker
    pub async fn run_analysis(&self, ticker: &str) -> Result<Report> {
        let mut state = RunState::Fetching;
        info!("Starting analysis workflow for {ticker} [{state}]");

        if let Err(e) = self.fetcher.fetch_stock_data(ticker, &self.store).await {
            state = RunState::Error;
            debug!("Workflow for {ticker} ended in state {state}");
            let e = match e {
                fetch @ AnalysisError::Fetch(_) => fetch,
                other => AnalysisError::Fetch(other.to_string()),
            };
            return Err(e);
        }

        state = RunState::Analyzing;
        debug!("Workflow for {ticker} entered state {state}");

        let outcomes = if self.parallel {
            join_all(self.stages.iter().map(|s| s.run(ticker, &self.store))).await
        } else {
            let mut outcomes = Vec::with_capacity(self.stages.len());
            for stage in &self.stages {
                outcomes.push(stage.run(ticker, &self.store).await);
            }
            outcomes
        };

        for (stage, outcome) in self.stages.iter().zip(&outcomes) {
            if let Err(e) = outcome {
                warn!("Stage {} failed for {ticker}: {e}", stage.name());
            }
        }

        state = RunState::Aggregating;
        debug!("Workflow for {ticker} entered state {state}");

        match self.reporter.generate_report(ticker, &self.store).await {
            Ok(report) => {
                state = RunState::Done;
                info!("Analysis workflow completed for {ticker} [{state}]");
                Ok(report)
            }
            Err(e) => {
                state = RunState::Error;
                debug!("Workflow for {ticker} ended in state {state}");
                Err(e)
            }
        }
    }
}
