//! Ticker and figure extraction from article text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

/// Uppercase words that look like tickers but almost never are.
pub const COMMON_WORDS: &[&str] = &[
    "A", "I", "FOR", "AT", "BE", "CEO", "CFO", "CTO", "THE", "AND", "OR", "ON", "IN", "BY",
    "IT", "IS", "TO", "OF",
];

/// Longest run of capitals still treated as a ticker.
pub const MAX_SYMBOL_LEN: usize = 5;

static SYMBOL_CANDIDATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?([A-Z]+)").expect("valid symbol regex"));
static PRICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+(?:\.\d{1,2})?)").expect("valid price regex"));
static PERCENTAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d{1,2})?)%").expect("valid percentage regex"));
static MILLIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d{1,2})?)\s+(?:million|m\b)").expect("valid millions regex")
});
static BILLIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d{1,2})?)\s+(?:billion|b\b)").expect("valid billions regex")
});

/// Ticker-like tokens: one to five capitals, optionally `$`-prefixed, standing
/// alone as a word and followed by whitespace, end of text or one of
/// `. , ( ) : ; " '`. Common uppercase words are dropped. Sorted, no repeats.
pub fn extract_symbols(text: &str) -> Vec<String> {
    let mut symbols = BTreeSet::new();

    for caps in SYMBOL_CANDIDATE.captures_iter(text) {
        let (Some(whole), Some(letters)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let symbol = letters.as_str();

        if symbol.len() > MAX_SYMBOL_LEN || COMMON_WORDS.contains(&symbol) {
            continue;
        }
        let glued_before = text[..whole.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_');
        if glued_before {
            continue;
        }
        let terminated = match text[whole.end()..].chars().next() {
            None => true,
            Some(c) => c.is_whitespace() || matches!(c, '.' | ',' | '(' | ')' | ':' | ';' | '"' | '\''),
        };
        if terminated {
            symbols.insert(symbol.to_string());
        }
    }

    symbols.into_iter().collect()
}

/// Company name -> ticker symbols, supplied by the caller.
pub type CompanyDatabase = BTreeMap<String, Vec<String>>;

/// Names from `companies` that occur in `text`, ignoring case, in database
/// order. Blank names never match.
pub fn extract_company_names(text: &str, companies: &CompanyDatabase) -> Vec<String> {
    if text.is_empty() || companies.is_empty() {
        return Vec::new();
    }

    let haystack = text.to_lowercase();
    companies
        .keys()
        .filter(|name| {
            let needle = name.trim().to_lowercase();
            !needle.is_empty() && haystack.contains(&needle)
        })
        .cloned()
        .collect()
}

/// Tickers of every company named in `text`, sorted and without repeats.
pub fn company_symbols(text: &str, companies: &CompanyDatabase) -> Vec<String> {
    let symbols: BTreeSet<String> = extract_company_names(text, companies)
        .iter()
        .filter_map(|name| companies.get(name))
        .flatten()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();
    symbols.into_iter().collect()
}

/// Figures quoted in an article
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleMetrics {
    /// `$12.50` style amounts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prices: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub percentages: Vec<f64>,
    /// `N million` / `N m`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub millions: Vec<f64>,
    /// `N billion` / `N b`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub billions: Vec<f64>,
}

impl ArticleMetrics {
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
            && self.percentages.is_empty()
            && self.millions.is_empty()
            && self.billions.is_empty()
    }
}

/// Pull prices, percentages and million/billion amounts out of `text`, in
/// order of appearance.
pub fn extract_metrics(text: &str) -> ArticleMetrics {
    if text.is_empty() {
        return ArticleMetrics::default();
    }

    let lower = text.to_lowercase();
    ArticleMetrics {
        prices: numbers(&PRICE, text),
        percentages: numbers(&PERCENTAGE, text),
        millions: numbers(&MILLIONS, &lower),
        billions: numbers(&BILLIONS, &lower),
    }
}

fn numbers(pattern: &Regex, text: &str) -> Vec<f64> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .collect()
}
