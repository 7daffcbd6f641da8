// src/patterns.rs
//! Phrase-pattern overrides layered on top of the lexicon score.
//!
//! Each pattern is a case-insensitive literal phrase matched against the whole comment.
//! A pattern that matches contributes its weight once, however many times it occurs.
//! Negative and positive sets are evaluated independently, so they can cancel out.

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Magnitude each matching pattern adds to (positive) or removes from (negative) the score.
pub const PATTERN_WEIGHT: f64 = 0.5;

/// Complaints the lexicon tends to miss (fit/size issues, negated praise, condition).
pub const NEGATIVE_PHRASES: &[&str] = &[
    "don't like",
    "do not like",
    "doesn't fit",
    "does not fit",
    "too small",
    "too large",
    "too big",
    "not good",
    "not great",
    "not interested",
    "not what",
    "disappointed",
    "don't want",
    "do not want",
    "not happy",
    "not satisfied",
    "waste",
    "terrible",
    "horrible",
    "awful",
    "poor quality",
    "bad condition",
    "damaged",
    "broken",
    "ugly",
    "hate",
    "worst",
    "useless",
];

pub const POSITIVE_PHRASES: &[&str] = &[
    "love it",
    "i love",
    "so good",
    "very good",
    "excellent",
    "amazing",
    "wonderful",
    "fantastic",
    "perfect",
    "exactly what",
    "just what",
    "thank you",
    "thanks",
    "appreciate",
    "great",
    "awesome",
    "beautiful",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Negative,
    Positive,
}

impl Polarity {
    pub fn weight(self) -> f64 {
        match self {
            Polarity::Negative => -PATTERN_WEIGHT,
            Polarity::Positive => PATTERN_WEIGHT,
        }
    }
}

#[derive(Debug, Clone)]
struct Pattern {
    phrase: String,
    polarity: Polarity,
    re: Regex,
}

/// One pattern that fired for a given input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternHit {
    pub pattern: String,
    pub polarity: Polarity,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatternOutcome {
    pub adjustment: f64,
    pub hits: Vec<PatternHit>,
}

/// Ordered pattern sets: all negatives first, then all positives.
#[derive(Debug, Clone)]
pub struct PatternTable {
    patterns: Vec<Pattern>,
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::with_extra::<&str>(&[], &[]).expect("built-in phrase patterns compile")
    }
}

impl PatternTable {
    /// Built-in sets followed by configured phrases. Blank entries and phrases already
    /// present in the same set are dropped so nothing counts twice.
    pub fn with_extra<S: AsRef<str>>(
        extra_negative: &[S],
        extra_positive: &[S],
    ) -> Result<Self, regex::Error> {
        let mut patterns = Vec::new();
        let mut seen: HashSet<(Polarity, String)> = HashSet::new();

        let negatives = NEGATIVE_PHRASES
            .iter()
            .copied()
            .chain(extra_negative.iter().map(AsRef::<str>::as_ref));
        let positives = POSITIVE_PHRASES
            .iter()
            .copied()
            .chain(extra_positive.iter().map(AsRef::<str>::as_ref));

        for (polarity, phrases) in [
            (Polarity::Negative, negatives.collect::<Vec<_>>()),
            (Polarity::Positive, positives.collect::<Vec<_>>()),
        ] {
            for phrase in phrases {
                let key = phrase.trim().to_lowercase();
                if key.is_empty() || !seen.insert((polarity, key.clone())) {
                    continue;
                }
                let re = RegexBuilder::new(&regex::escape(&key))
                    .case_insensitive(true)
                    .build()?;
                patterns.push(Pattern {
                    phrase: key,
                    polarity,
                    re,
                });
            }
        }

        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Phrases of one polarity, in evaluation order.
    pub fn phrases(&self, polarity: Polarity) -> impl Iterator<Item = &str> + '_ {
        self.patterns
            .iter()
            .filter(move |p| p.polarity == polarity)
            .map(|p| p.phrase.as_str())
    }

    /// Sum of weights for every pattern that occurs at least once in `text`.
    pub fn evaluate(&self, text: &str) -> PatternOutcome {
        let lower = text.to_lowercase();
        let mut out = PatternOutcome::default();

        for p in &self.patterns {
            if p.re.is_match(&lower) {
                let weight = p.polarity.weight();
                out.adjustment += weight;
                debug!(target: "sentiment", pattern = %p.phrase, polarity = ?p.polarity, "pattern detected");
                out.hits.push(PatternHit {
                    pattern: p.phrase.clone(),
                    polarity: p.polarity,
                    weight,
                });
            }
        }
        out
    }
}
