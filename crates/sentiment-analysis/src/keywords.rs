//! Frequency-ranked keyword extraction.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock};

use crate::normalize::normalize;

/// Default number of keywords kept per article
pub const DEFAULT_MAX_KEYWORDS: usize = 10;

/// Tokens must be longer than this many characters to count as keywords.
pub const MIN_KEYWORD_LEN: usize = 2;

/// Looser minimum used by the lightweight per-article processor.
pub const SIMPLE_MIN_KEYWORD_LEN: usize = 1;

/// English stop words (NLTK list)
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
    "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him",
    "his", "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its",
    "itself", "they", "them", "their", "theirs", "themselves", "what", "which", "who",
    "whom", "this", "that", "that'll", "these", "those", "am", "is", "are", "was",
    "were", "be", "been", "being", "have", "has", "had", "having", "do", "does", "did",
    "doing", "a", "an", "the", "and", "but", "if", "or", "because", "as", "until",
    "while", "of", "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "to", "from", "up", "down",
    "in", "out", "on", "off", "over", "under", "again", "further", "then", "once", "here",
    "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so",
    "than", "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should",
    "should've", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't",
    "couldn", "couldn't", "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn",
    "hasn't", "haven", "haven't", "isn", "isn't", "ma", "mightn", "mightn't", "mustn",
    "mustn't", "needn", "needn't", "shan", "shan't", "shouldn", "shouldn't", "wasn",
    "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
];

static DEFAULT_EXTRACTOR: LazyLock<KeywordExtractor> =
    LazyLock::new(|| KeywordExtractor::english(MIN_KEYWORD_LEN));

/// Extract the most frequent non-stop-word tokens from `text` with the
/// default English stop words and minimum length. The text is normalized
/// first; already-normalized input is unaffected.
pub fn extract_keywords(text: &str, max_keywords: usize) -> Vec<String> {
    DEFAULT_EXTRACTOR.extract(&normalize(text), max_keywords)
}

/// Keyword extractor with an explicit stop-word set and length floor
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    stop_words: Arc<HashSet<String>>,
    min_len: usize,
}

impl KeywordExtractor {
    pub fn new(stop_words: HashSet<String>, min_len: usize) -> Self {
        Self {
            stop_words: Arc::new(stop_words),
            min_len,
        }
    }

    pub fn english(min_len: usize) -> Self {
        Self::new(
            ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            min_len,
        )
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(&token.to_lowercase())
    }

    /// Rank tokens of normalized text by frequency, ties in order of first
    /// appearance, and return at most `max_keywords` of them.
    pub fn extract(&self, text: &str, max_keywords: usize) -> Vec<String> {
        if text.is_empty() || max_keywords == 0 {
            return Vec::new();
        }

        let mut counts: Vec<(&str, usize)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for token in tokenize(text) {
            if token.chars().count() <= self.min_len || self.is_stop_word(token) {
                continue;
            }
            match index.get(token) {
                Some(&pos) => counts[pos].1 += 1,
                None => {
                    index.insert(token, counts.len());
                    counts.push((token, 1));
                }
            }
        }

        // stable: equal counts keep first-occurrence order
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
            .into_iter()
            .take(max_keywords)
            .map(|(token, _)| token.to_string())
            .collect()
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::english(MIN_KEYWORD_LEN)
    }
}

/// Whitespace tokens with the `$ % .` symbols the normalizer keeps trimmed
/// from both ends, so `$1.50` yields `1.50` and `growth.` yields `growth`.
/// Dotted abbreviations such as `u.s.` keep their final period.
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .map(|t| {
            let t = t.trim_matches(|c: char| matches!(c, '$' | '%'));
            if is_abbreviation(t) {
                t
            } else {
                t.trim_matches(|c: char| matches!(c, '$' | '%' | '.'))
            }
        })
        .filter(|t| !t.is_empty())
}

/// Two or more single letters each followed by a period (`u.s.`, `e.g.`).
fn is_abbreviation(token: &str) -> bool {
    let chars: Vec<char> = token.chars().collect();
    chars.len() >= 4
        && chars.len() % 2 == 0
        && chars
            .chunks(2)
            .all(|pair| pair[0].is_alphabetic() && pair[1] == '.')
}
