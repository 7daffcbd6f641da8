// src/classifier.rs
//! Sentiment classifier: lexicon base score + phrase-pattern adjustment → three-way label.
//!
//! Thresholds are fixed and asymmetric:
//! - `final < 0`    → negative
//! - `final > 0.2`  → positive
//! - otherwise      → neutral (so an exact 0 is neutral)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::error::ClassifierError;
use crate::lexicon::{AfinnLexicon, Lexicon};
use crate::patterns::{PatternHit, PatternTable};

/// Scores strictly below this are negative.
pub const NEGATIVE_BELOW: f64 = 0.0;
/// Scores strictly above this are positive.
pub const POSITIVE_ABOVE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

impl SentimentLabel {
    /// Order of comparisons matters: `< 0` first, then `> 0.2`, else neutral.
    pub fn from_score(score: f64) -> Self {
        if score < NEGATIVE_BELOW {
            SentimentLabel::Negative
        } else if score > POSITIVE_ABOVE {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Positive => "positive",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the lexicon sum becomes the base score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreMode {
    /// Plain sum of token weights.
    #[default]
    Sum,
    /// Sum divided by token count (0 for empty input).
    Mean,
}

impl FromStr for ScoreMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(ScoreMode::Sum),
            "mean" | "avg" | "average" => Ok(ScoreMode::Mean),
            other => Err(format!("unknown score mode '{other}' (expected sum|mean)")),
        }
    }
}

/// Full breakdown of one classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub base_score: f64,
    pub pattern_adjustment: f64,
    pub final_score: f64,
    pub label: SentimentLabel,
    /// Patterns that fired, negatives first.
    pub hits: Vec<PatternHit>,
}

/// Immutable after construction; share it behind an `Arc`.
pub struct SentimentClassifier {
    lexicon: Arc<dyn Lexicon>,
    patterns: PatternTable,
    mode: ScoreMode,
}

impl fmt::Debug for SentimentClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentimentClassifier")
            .field("patterns", &self.patterns.len())
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl SentimentClassifier {
    pub fn new(lexicon: Arc<dyn Lexicon>, patterns: PatternTable) -> Self {
        Self {
            lexicon,
            patterns,
            mode: ScoreMode::Sum,
        }
    }

    pub fn with_mode(mut self, mode: ScoreMode) -> Self {
        self.mode = mode;
        self
    }

    /// Loads the lexicon and compiles the pattern table described by `cfg`.
    pub fn from_config(cfg: &ServiceConfig) -> anyhow::Result<Self> {
        let lexicon = AfinnLexicon::load(cfg.lexicon_path.as_deref())?;
        let patterns = PatternTable::with_extra(&cfg.extra_negative, &cfg.extra_positive)?;
        Ok(Self::new(Arc::new(lexicon), patterns).with_mode(cfg.score_mode))
    }

    pub fn mode(&self) -> ScoreMode {
        self.mode
    }

    pub fn patterns(&self) -> &PatternTable {
        &self.patterns
    }

    pub fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        let tokens: Vec<&str> = text.split_whitespace().collect();

        let sum = self.lexicon.score(&tokens)?;
        let base_score = match self.mode {
            ScoreMode::Sum => sum,
            ScoreMode::Mean if tokens.is_empty() => 0.0,
            ScoreMode::Mean => sum / tokens.len() as f64,
        };

        let outcome = self.patterns.evaluate(text);
        let final_score = base_score + outcome.adjustment;

        Ok(Classification {
            base_score,
            pattern_adjustment: outcome.adjustment,
            final_score,
            label: SentimentLabel::from_score(final_score),
            hits: outcome.hits,
        })
    }
}
