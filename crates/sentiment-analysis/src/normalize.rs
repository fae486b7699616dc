//! Text normalization ahead of scoring and keyword extraction.

use regex::Regex;
use std::sync::LazyLock;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+|www\.\S+").expect("valid URL pattern"));

// Word characters, whitespace, and the currency/percent/decimal symbols.
static DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s$%.]").expect("valid character class"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Lowercase, drop URLs and punctuation other than `$ % .`, and collapse
/// whitespace. Keeps amounts such as `$1.50` and `3.5%` intact.
///
/// URLs are stripped a second time after punctuation removal, since dropping
/// a character can expose a new `www.` run. That makes the function
/// idempotent.
pub fn normalize(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let lowered = text.to_lowercase();
    let without_urls = URL_PATTERN.replace_all(&lowered, "");
    let stripped = DISALLOWED_CHARS.replace_all(&without_urls, "");
    let stripped = URL_PATTERN.replace_all(&stripped, "");

    WHITESPACE_RUN.replace_all(&stripped, " ").trim().to_string()
}
