use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::stats;

/// Per-item label threshold: compound >= 0.05 is positive, <= -0.05 negative.
pub const ITEM_LABEL_THRESHOLD: f64 = 0.05;

/// Aggregate label threshold. Deliberately coarser than the per-item one so a
/// single borderline article cannot flip the label of a whole summary.
pub const AGGREGATE_LABEL_THRESHOLD: f64 = 0.2;

/// Category used when a news item carries none.
pub const DEFAULT_CATEGORY: &str = "general";

/// News item as handed over by the fetch/cache layer.
///
/// Field names follow the market-data provider's wire format (`datetime`,
/// `related`), so cached JSON deserializes directly. Missing or null text
/// fields become empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewsItem {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub headline: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub summary: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub source: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub url: String,
    /// Unix timestamp in seconds
    #[serde(rename = "datetime", default)]
    pub published_at: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    /// Related ticker symbols. Accepts a comma-joined string or a list.
    #[serde(default, deserialize_with = "related_symbols")]
    pub related: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl NewsItem {
    /// Text fed to the sentiment pipeline: `headline. summary`, or whichever
    /// of the two is present.
    pub fn analysis_text(&self) -> String {
        let headline = self.headline.trim();
        let summary = self.summary.trim();
        match (headline.is_empty(), summary.is_empty()) {
            (false, false) => format!("{}. {}", headline, summary),
            (false, true) => headline.to_string(),
            (true, false) => summary.to_string(),
            (true, true) => String::new(),
        }
    }

    /// Publication time, if the timestamp is present, positive and in range.
    pub fn published_utc(&self) -> Option<DateTime<Utc>> {
        self.published_at
            .filter(|ts| *ts > 0)
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
    }

    /// UTC calendar day of publication.
    pub fn published_date(&self) -> Option<NaiveDate> {
        self.published_utc().map(|dt| dt.date_naive())
    }

    /// Category, falling back to `general`.
    pub fn category_or_default(&self) -> &str {
        match self.category.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => c,
            _ => DEFAULT_CATEGORY,
        }
    }

    /// Whether `symbol` is among the related tickers (case-insensitive).
    pub fn mentions(&self, symbol: &str) -> bool {
        self.related.iter().any(|s| s.eq_ignore_ascii_case(symbol))
    }
}

/// Split a comma-joined ticker list, dropping blanks.
pub fn split_related(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RelatedRepr {
    Joined(String),
    List(Vec<String>),
}

fn related_symbols<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let symbols = match Option::<RelatedRepr>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(RelatedRepr::Joined(joined)) => split_related(&joined),
        Some(RelatedRepr::List(list)) => list
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    };
    Ok(symbols)
}

/// Three-way sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Label a score against a symmetric threshold. Both bounds are inclusive.
    pub fn from_score(score: f64, threshold: f64) -> Self {
        if score >= threshold {
            SentimentLabel::Positive
        } else if score <= -threshold {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    /// Label for a single article's compound score.
    pub fn for_item(score: f64) -> Self {
        Self::from_score(score, ITEM_LABEL_THRESHOLD)
    }

    /// Label for an average over many articles.
    pub fn for_aggregate(avg_score: f64) -> Self {
        Self::from_score(avg_score, AGGREGATE_LABEL_THRESHOLD)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw scorer output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarityScores {
    /// Normalized overall polarity in [-1, 1]
    pub compound: f64,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl PolarityScores {
    /// Result for text with nothing to score.
    pub fn neutral() -> Self {
        Self {
            compound: 0.0,
            positive: 0.0,
            negative: 0.0,
            neutral: 1.0,
        }
    }
}

/// Share of the text's valence attributable to each polarity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SentimentBreakdown {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl Default for SentimentBreakdown {
    fn default() -> Self {
        Self {
            positive: 0.0,
            negative: 0.0,
            neutral: 1.0,
        }
    }
}

impl From<PolarityScores> for SentimentBreakdown {
    fn from(scores: PolarityScores) -> Self {
        Self {
            positive: scores.positive,
            negative: scores.negative,
            neutral: scores.neutral,
        }
    }
}

/// Sentiment attached to an article
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SentimentResult {
    /// Compound score in [-1, 1]
    pub score: f64,
    pub label: SentimentLabel,
    pub breakdown: SentimentBreakdown,
    /// Most frequent first
    pub keywords: Vec<String>,
}

impl SentimentResult {
    /// Degenerate result for empty text.
    pub fn neutral() -> Self {
        Self::default()
    }
}

/// News item plus its sentiment. Built once by the annotator, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AnnotatedNewsItem {
    #[serde(flatten)]
    pub item: NewsItem,
    pub sentiment: SentimentResult,
}

impl AnnotatedNewsItem {
    pub fn score(&self) -> f64 {
        self.sentiment.score
    }

    pub fn label(&self) -> SentimentLabel {
        self.sentiment.label
    }
}

impl AsRef<NewsItem> for NewsItem {
    fn as_ref(&self) -> &NewsItem {
        self
    }
}

impl AsRef<NewsItem> for AnnotatedNewsItem {
    fn as_ref(&self) -> &NewsItem {
        &self.item
    }
}

/// Count and share of one label
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LabelShare {
    pub count: usize,
    /// 0 to 100
    pub percentage: f64,
}

impl LabelShare {
    pub fn of(count: usize, total: usize) -> Self {
        Self {
            count,
            percentage: stats::percentage(count, total),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SentimentDistribution {
    pub positive: LabelShare,
    pub negative: LabelShare,
    pub neutral: LabelShare,
}

impl SentimentDistribution {
    pub fn get(&self, label: SentimentLabel) -> LabelShare {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }
}

/// One calendar day of aggregated sentiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DailySentiment {
    pub date: NaiveDate,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub avg_score: f64,
    pub count: usize,
}

/// Distributional summary for a symbol or category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SentimentSummary {
    /// Symbol or category
    pub identifier: String,
    pub count: usize,
    pub avg_score: f64,
    pub sentiment_distribution: SentimentDistribution,
    pub overall_sentiment: SentimentLabel,
    /// Ascending by date, one entry per day
    pub time_series: Vec<DailySentiment>,
}

impl SentimentSummary {
    /// Zeroed summary for an empty item set.
    pub fn empty(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            count: 0,
            avg_score: 0.0,
            sentiment_distribution: SentimentDistribution::default(),
            overall_sentiment: SentimentLabel::Neutral,
            time_series: Vec::new(),
        }
    }

    /// Trailing rolling mean of the daily averages, e.g. a 7-day trend line.
    ///
    /// The window is clamped to the series length and is at least 1.
    pub fn rolling_average(&self, window: usize) -> Vec<(NaiveDate, f64)> {
        let scores: Vec<f64> = self.time_series.iter().map(|d| d.avg_score).collect();
        let window = window.min(scores.len()).max(1);
        self.time_series
            .iter()
            .map(|d| d.date)
            .zip(stats::rolling_mean(&scores, window))
            .collect()
    }
}

/// Occurrences of one keyword across a set of articles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

/// Number of articles from one outlet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SourceCount {
    pub source: String,
    pub count: usize,
}

/// Compact per-symbol view used by dashboards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SymbolSentiment {
    pub symbol: String,
    /// Rounded to two decimals
    pub average_sentiment: f64,
    pub sentiment_trend: SentimentLabel,
    pub news_count: usize,
}
