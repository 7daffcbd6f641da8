// src/lexicon.rs
//! Lexicon collaborator: word → weight table consulted per whitespace token.
//!
//! The default implementation is AFINN (integer weights in -5..=5) with Porter2 stemming as
//! a fallback lookup. The full AFINN-165 table is embedded at compile time; a customised file
//! can be supplied via config instead.

use anyhow::{bail, Context, Result};
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::ClassifierError;

const EMBEDDED_AFINN: &str = include_str!("../data/afinn.txt");

/// Narrow seam between the classifier and whatever produces the base score.
pub trait Lexicon: Send + Sync {
    /// Sum of per-token weights. Unknown tokens contribute 0.
    fn score(&self, tokens: &[&str]) -> Result<f64, ClassifierError>;
}

pub struct AfinnLexicon {
    words: HashMap<String, i32>,
    stems: HashMap<String, i32>,
    stemmer: Stemmer,
}

impl fmt::Debug for AfinnLexicon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AfinnLexicon")
            .field("words", &self.words.len())
            .field("stems", &self.stems.len())
            .field("stemmer", &"<Porter2>")
            .finish()
    }
}

impl AfinnLexicon {
    /// Table compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::parse(EMBEDDED_AFINN).context("parsing embedded AFINN table")
    }

    /// Load a tab-separated AFINN file (`word<TAB>weight` per line).
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading lexicon from {}", path.display()))?;
        let lex = Self::parse(&raw)
            .with_context(|| format!("parsing lexicon {}", path.display()))?;
        info!(target: "sentiment", path = %path.display(), entries = lex.len(), "lexicon loaded");
        Ok(lex)
    }

    /// Either the configured file or the embedded table.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::embedded(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let stemmer = Stemmer::create(Algorithm::English);
        let mut words = HashMap::new();
        let mut stems = HashMap::new();

        for (lineno, line) in raw.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((word, weight)) = line.rsplit_once('\t') else {
                warn!(target: "sentiment", line = lineno + 1, "lexicon line without tab, skipped");
                continue;
            };
            let Ok(weight) = weight.trim().parse::<i32>() else {
                warn!(target: "sentiment", line = lineno + 1, "lexicon weight not an integer, skipped");
                continue;
            };
            let word = word.trim().to_lowercase();
            // Later lines overwrite earlier ones, for exact keys and for shared stems alike.
            stems.insert(stemmer.stem(&word).into_owned(), weight);
            words.insert(word, weight);
        }

        if words.is_empty() {
            bail!("lexicon has no usable entries");
        }
        Ok(Self {
            words,
            stems,
            stemmer,
        })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Weight for a single raw token: exact (lower-cased) entry first, then its stem.
    ///
    /// When several entries reduce to the same stem, the one appearing last in the table
    /// owns that stem. With the sorted AFINN file `amaze 2` / `amazing 4` share `amaz`, so an
    /// unlisted inflection such as `amazes` resolves to 4 while `amaze` itself stays 2.
    pub fn weight(&self, token: &str) -> i32 {
        let lower = token.to_lowercase();
        if let Some(w) = self.words.get(&lower) {
            return *w;
        }
        let stem = self.stemmer.stem(&lower);
        self.stems.get(&*stem).copied().unwrap_or(0)
    }
}

impl Lexicon for AfinnLexicon {
    fn score(&self, tokens: &[&str]) -> Result<f64, ClassifierError> {
        Ok(tokens.iter().map(|t| f64::from(self.weight(t))).sum())
    }
}
