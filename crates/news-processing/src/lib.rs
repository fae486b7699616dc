//! Structured extraction over raw news items: tickers, quoted figures, topic
//! categories and publication time, plus keyword filtering and per-symbol
//! grouping. Runs before or beside sentiment analysis and never scores text.

use analysis_core::NewsItem;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub mod category;
pub mod extract;

pub use category::{categorize, NewsCategory};
pub use extract::{
    company_symbols, extract_company_names, extract_metrics, extract_symbols, ArticleMetrics,
    CompanyDatabase, COMMON_WORDS, MAX_SYMBOL_LEN,
};

/// News item with its extracted data attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedArticle {
    #[serde(flatten)]
    pub item: NewsItem,
    pub symbols: Vec<String>,
    pub metrics: ArticleMetrics,
    pub categories: Vec<NewsCategory>,
    /// ISO-8601 UTC publication time, absent when the timestamp is unusable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
}

/// Extract symbols, metrics, categories and the publication time of one item.
pub fn process_article(item: NewsItem) -> ProcessedArticle {
    let text = item.analysis_text();

    let published = item
        .published_utc()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true));
    if published.is_none() {
        if let Some(ts) = item.published_at {
            tracing::warn!("Unusable publication timestamp {} on '{}'", ts, item.headline);
        }
    }

    ProcessedArticle {
        symbols: extract_symbols(&text),
        metrics: extract_metrics(&text),
        categories: categorize(&item.headline, &item.summary),
        published,
        item,
    }
}

pub fn process_batch(items: Vec<NewsItem>) -> Vec<ProcessedArticle> {
    tracing::debug!("Processing {} news items", items.len());
    items.into_iter().map(process_article).collect()
}

/// Items whose `headline. summary` contains any of `keywords`, ignoring case.
/// An empty keyword list keeps everything.
pub fn filter_by_keywords<T, S>(items: &[T], keywords: &[S]) -> Vec<T>
where
    T: AsRef<NewsItem> + Clone,
    S: AsRef<str>,
{
    let needles: Vec<String> = keywords
        .iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    if needles.is_empty() {
        return items.to_vec();
    }

    items
        .iter()
        .filter(|item| {
            let item = item.as_ref();
            let haystack = format!("{}. {}", item.headline, item.summary).to_lowercase();
            needles.iter().any(|n| haystack.contains(n.as_str()))
        })
        .cloned()
        .collect()
}

/// Items keyed by each related ticker (uppercased). An item with several
/// tickers appears under each of them once; items without tickers are left out.
pub fn group_by_symbol<T>(items: &[T]) -> BTreeMap<String, Vec<T>>
where
    T: AsRef<NewsItem> + Clone,
{
    let mut groups: BTreeMap<String, Vec<T>> = BTreeMap::new();
    for item in items {
        let symbols: BTreeSet<String> = item
            .as_ref()
            .related
            .iter()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        for symbol in symbols {
            groups.entry(symbol).or_default().push(item.clone());
        }
    }
    groups
}
