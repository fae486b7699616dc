//! Valence lexicons
//!
//! The general-purpose VADER lexicon (about 7,500 terms, or a file in the same
//! text format) is overlaid once with the finance-specific table below. The merged map is immutable afterwards and
//! shared between scorers behind an `Arc`.

use analysis_core::AnalysisError;
use std::collections::HashMap;
use std::path::Path;

/// Finance-specific valences. These take precedence over any general weight
/// for the same term.
pub const FINANCIAL_TERMS: &[(&str, f64)] = &[
    // Positive terms
    ("growth", 2.0),
    ("profit", 2.0),
    ("earnings", 1.5),
    ("dividend", 1.7),
    ("exceeded", 1.8),
    ("beat", 1.8),
    ("upgrade", 2.0),
    ("outperform", 1.9),
    ("bull", 1.5),
    ("bullish", 1.8),
    ("rally", 1.6),
    ("gain", 1.5),
    ("rise", 1.0),
    ("boost", 1.5),
    ("surge", 1.8),
    ("upside", 1.7),
    ("strong", 1.5),
    ("robust", 1.6),
    // Negative terms
    ("loss", -2.0),
    ("losses", -2.0),
    ("debt", -1.5),
    ("decline", -1.5),
    ("downgrade", -2.0),
    ("underperform", -1.9),
    ("bear", -1.5),
    ("bearish", -1.8),
    ("sell-off", -1.7),
    ("drop", -1.5),
    ("fall", -1.0),
    ("plunge", -2.0),
    ("crash", -2.5),
    ("miss", -1.8),
    ("bankruptcy", -2.5),
    ("recession", -2.0),
    ("inflation", -1.5),
    ("disappointing", -1.8),
    ("warning", -1.7),
    ("risk", -1.5),
    ("weakness", -1.7),
    ("volatile", -1.3),
    ("layoffs", -2.0),
    ("lawsuit", -1.8),
];

/// Immutable term -> valence mapping. Terms are stored lowercase.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexicon {
    weights: HashMap<String, f64>,
}

impl Lexicon {
    /// Parse a lexicon in VADER text format: one `token<TAB>valence[<TAB>...]`
    /// entry per line. Blank lines and `#` comments are skipped.
    pub fn parse(raw: &str) -> Result<Self, AnalysisError> {
        let mut weights = HashMap::new();

        for (idx, line) in raw.lines().enumerate() {
            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split('\t');
            let token = fields.next().unwrap_or_default().trim();
            let weight = fields.next().map(str::trim).ok_or_else(|| {
                AnalysisError::LexiconLoad(format!("line {}: missing valence for {:?}", idx + 1, token))
            })?;

            if token.is_empty() {
                return Err(AnalysisError::LexiconLoad(format!("line {}: empty token", idx + 1)));
            }

            let weight: f64 = weight.parse().map_err(|_| {
                AnalysisError::LexiconLoad(format!(
                    "line {}: invalid valence {:?} for {:?}",
                    idx + 1,
                    weight,
                    token
                ))
            })?;

            if !weight.is_finite() {
                return Err(AnalysisError::LexiconLoad(format!(
                    "line {}: non-finite valence for {:?}",
                    idx + 1,
                    token
                )));
            }

            weights.insert(token.to_lowercase(), weight);
        }

        if weights.is_empty() {
            return Err(AnalysisError::LexiconLoad("lexicon contains no entries".to_string()));
        }

        Ok(Self { weights })
    }

    /// The complete VADER lexicon bundled with `vader_sentiment`.
    pub fn vader() -> Self {
        Self {
            weights: vader_sentiment::LEXICON
                .iter()
                .map(|(term, weight)| (term.to_lowercase(), *weight))
                .collect(),
        }
    }

    /// Load a general-purpose lexicon from disk, e.g. the full
    /// `vader_lexicon.txt` distribution.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&raw)
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = &'a (&'a str, f64)>) -> Self {
        Self {
            weights: pairs
                .into_iter()
                .map(|(term, weight)| (term.to_lowercase(), *weight))
                .collect(),
        }
    }

    /// The finance-specific table as a lexicon.
    pub fn financial() -> Self {
        Self::from_pairs(FINANCIAL_TERMS)
    }

    /// Overlay `overrides` on `base`. Terms present in both keep the
    /// override's weight.
    pub fn merged(base: Lexicon, overrides: &Lexicon) -> Self {
        let mut weights = base.weights;
        let mut replaced = 0usize;

        for (term, weight) in &overrides.weights {
            if weights.insert(term.clone(), *weight).is_some() {
                replaced += 1;
            }
        }

        tracing::debug!(
            "Merged lexicon: {} terms ({} overridden, {} added)",
            weights.len(),
            replaced,
            overrides.weights.len() - replaced
        );

        Self { weights }
    }

    /// VADER lexicon overlaid with the financial table.
    pub fn financial_default() -> Self {
        Self::merged(Self::vader(), &Self::financial())
    }

    /// Look up a term. Callers pass lowercase text.
    pub fn get(&self, term: &str) -> Option<f64> {
        self.weights.get(term).copied()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.weights.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
