//! Headline sentiment scoring collaborator
//!
//! The sentiment stage depends on this trait only; the default lexicon
//! implementation keeps the pipeline deterministic and self-contained.

/// Scores a single headline with a polarity in [-1, 1]
pub trait SentimentScorer: Send + Sync {
    /// Polarity of a headline: -1 strongly negative, 0 neutral, 1 strongly
    /// positive
    fn polarity(&self, headline: &str) -> f64;
}

/// Word-list polarity scorer tuned for finance headlines
///
/// Polarity is `(positive_hits - negative_hits) / total_hits`; a headline
/// with no lexicon word scores 0.0.
pub struct LexiconScorer;

const POSITIVE_WORDS: &[&str] = &[
    "beat", "beats", "bullish", "buy", "climb", "climbs", "gain", "gains", "good", "great",
    "growth", "high", "jump", "jumps", "outperform", "profit", "profits", "raise", "raised",
    "rallies", "rally", "record", "rise", "rises", "soar", "soars", "strong", "surge", "surges",
    "top", "tops", "up", "upgrade", "upgraded", "upside", "win", "wins",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "bearish", "concern", "concerns", "crash", "cut", "cuts", "decline", "declines",
    "down", "downgrade", "downgraded", "drop", "drops", "fall", "falls", "fear", "fears",
    "fraud", "lawsuit", "loss", "losses", "low", "miss", "misses", "plunge", "plunges", "probe",
    "recall", "risk", "risks", "sell", "short", "sink", "sinks", "slump", "slumps", "tumble",
    "tumbles", "warn", "warning", "warns", "weak",
];

impl LexiconScorer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for LexiconScorer {
    fn polarity(&self, headline: &str) -> f64 {
        let mut positive = 0_usize;
        let mut negative = 0_usize;

        for token in headline
            .split(|c: char| !c.is_alphabetic())
            .filter(|t| !t.is_empty())
        {
            let token = token.to_lowercase();
            if POSITIVE_WORDS.binary_search(&token.as_str()).is_ok() {
                positive += 1;
            } else if NEGATIVE_WORDS.binary_search(&token.as_str()).is_ok() {
                negative += 1;
            }
        }

        let total = positive + negative;
        if total == 0 {
            return 0.0;
        }

        (positive as f64 - negative as f64) / total as f64
    }
}
