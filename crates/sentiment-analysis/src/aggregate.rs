//! Sentiment aggregation
//!
//! Turns annotated articles into distributional summaries with a daily time
//! series. Empty input always yields a zeroed, neutral summary.

use analysis_core::stats::{self, round_to};
use analysis_core::{
    AnnotatedNewsItem, DailySentiment, KeywordCount, LabelShare, SentimentAggregator,
    SentimentDistribution, SentimentLabel, SentimentSummary, SourceCount, SymbolSentiment,
    AGGREGATE_LABEL_THRESHOLD,
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Words too common in financial news to say anything about a collection.
pub const GENERIC_NEWS_WORDS: &[&str] = &[
    "news", "market", "stock", "stocks", "report", "reports", "update", "updates",
];

/// Keywords returned by collection-level frequency counts unless asked otherwise
pub const DEFAULT_TOP_KEYWORDS: usize = 20;

/// Keywords re-extracted from each headline when pooling a collection
pub const HEADLINE_KEYWORDS: usize = 5;

/// Sources kept in a source distribution
pub const MAX_SOURCES: usize = 10;

pub const UNKNOWN_SOURCE: &str = "Unknown";

#[derive(Debug, Default)]
struct DayAccumulator {
    positive: usize,
    negative: usize,
    neutral: usize,
    score_sum: f64,
    count: usize,
}

impl DayAccumulator {
    fn add(&mut self, label: SentimentLabel, score: f64) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
        self.score_sum += score;
        self.count += 1;
    }

    fn finish(self, date: NaiveDate) -> DailySentiment {
        DailySentiment {
            date,
            positive: self.positive,
            negative: self.negative,
            neutral: self.neutral,
            avg_score: if self.count > 0 {
                self.score_sum / self.count as f64
            } else {
                0.0
            },
            count: self.count,
        }
    }
}

/// Builds [`SentimentSummary`] values
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    aggregate_threshold: f64,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(AGGREGATE_LABEL_THRESHOLD)
    }
}

impl Aggregator {
    pub fn new(aggregate_threshold: f64) -> Self {
        Self { aggregate_threshold }
    }

    pub fn summarize(&self, identifier: &str, items: &[AnnotatedNewsItem]) -> SentimentSummary {
        if items.is_empty() {
            return SentimentSummary::empty(identifier);
        }

        let total = items.len();
        let count_of = |label: SentimentLabel| items.iter().filter(|i| i.label() == label).count();

        let scores: Vec<f64> = items.iter().map(AnnotatedNewsItem::score).collect();
        let avg_score = stats::mean(&scores);

        let summary = SentimentSummary {
            identifier: identifier.to_string(),
            count: total,
            avg_score,
            sentiment_distribution: SentimentDistribution {
                positive: LabelShare::of(count_of(SentimentLabel::Positive), total),
                negative: LabelShare::of(count_of(SentimentLabel::Negative), total),
                neutral: LabelShare::of(count_of(SentimentLabel::Neutral), total),
            },
            overall_sentiment: SentimentLabel::from_score(avg_score, self.aggregate_threshold),
            time_series: daily_series(items),
        };

        tracing::debug!(
            "Summarized {} articles for {}: avg {:.4} ({}), {} days",
            summary.count,
            identifier,
            summary.avg_score,
            summary.overall_sentiment,
            summary.time_series.len()
        );

        summary
    }

    /// One summary per related ticker. Articles tagged with several tickers
    /// count towards each of them.
    pub fn summarize_by_symbol(&self, items: &[AnnotatedNewsItem]) -> BTreeMap<String, SentimentSummary> {
        let mut groups: BTreeMap<String, Vec<AnnotatedNewsItem>> = BTreeMap::new();
        for item in items {
            let symbols: BTreeSet<String> = item
                .item
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
            .into_iter()
            .map(|(symbol, group)| {
                let summary = self.summarize(&symbol, &group);
                (symbol, summary)
            })
            .collect()
    }

    /// One summary per news category (`general` when missing).
    pub fn summarize_by_category(&self, items: &[AnnotatedNewsItem]) -> BTreeMap<String, SentimentSummary> {
        let mut groups: BTreeMap<String, Vec<AnnotatedNewsItem>> = BTreeMap::new();
        for item in items {
            groups
                .entry(item.item.category_or_default().to_string())
                .or_default()
                .push(item.clone());
        }
        groups
            .into_iter()
            .map(|(category, group)| {
                let summary = self.summarize(&category, &group);
                (category, summary)
            })
            .collect()
    }

    /// Most frequent stored keywords across `items`, generic news words
    /// excluded. Ties keep first-seen order.
    pub fn keyword_frequency(&self, items: &[AnnotatedNewsItem], top_n: usize) -> Vec<KeywordCount> {
        count_keywords(
            items.iter().flat_map(|i| i.sentiment.keywords.iter().cloned()),
            top_n,
        )
    }

    /// Article count per source, busiest first, at most [`MAX_SOURCES`].
    /// Items without a source count as `Unknown`.
    pub fn source_distribution(&self, items: &[AnnotatedNewsItem]) -> Vec<SourceCount> {
        let sources = items.iter().map(|i| match i.item.source.trim() {
            "" => UNKNOWN_SOURCE.to_string(),
            source => source.to_string(),
        });
        ranked_counts(sources)
            .into_iter()
            .take(MAX_SOURCES)
            .map(|(source, count)| SourceCount { source, count })
            .collect()
    }

    /// Dashboard line for a symbol: rounded average, trend label and count.
    pub fn symbol_snapshot(&self, symbol: &str, items: &[AnnotatedNewsItem]) -> SymbolSentiment {
        let scores: Vec<f64> = items.iter().map(AnnotatedNewsItem::score).collect();
        let avg = stats::mean(&scores);
        SymbolSentiment {
            symbol: symbol.to_string(),
            average_sentiment: round_to(avg, 2),
            sentiment_trend: SentimentLabel::from_score(avg, self.aggregate_threshold),
            news_count: items.len(),
        }
    }
}

impl SentimentAggregator for Aggregator {
    fn summarize(&self, identifier: &str, items: &[AnnotatedNewsItem]) -> SentimentSummary {
        Aggregator::summarize(self, identifier, items)
    }
}

/// Summarize with the default aggregate threshold.
pub fn summarize(identifier: &str, items: &[AnnotatedNewsItem]) -> SentimentSummary {
    Aggregator::default().summarize(identifier, items)
}

/// Count pooled keywords, drop [`GENERIC_NEWS_WORDS`] and keep the `top_n`
/// most frequent.
pub fn count_keywords<I>(words: I, top_n: usize) -> Vec<KeywordCount>
where
    I: IntoIterator<Item = String>,
{
    let words = words
        .into_iter()
        .filter(|w| !GENERIC_NEWS_WORDS.contains(&w.as_str()));
    ranked_counts(words)
        .into_iter()
        .take(top_n)
        .map(|(word, count)| KeywordCount { word, count })
        .collect()
}

/// Occurrence counts, highest first; equal counts keep first-seen order.
fn ranked_counts(values: impl IntoIterator<Item = String>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for value in values {
        match index.get(&value) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Bucket by UTC calendar day. Items without a usable timestamp are skipped.
fn daily_series(items: &[AnnotatedNewsItem]) -> Vec<DailySentiment> {
    let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();
    let mut undated = 0usize;

    for item in items {
        match item.item.published_date() {
            Some(date) => days.entry(date).or_default().add(item.label(), item.score()),
            None => undated += 1,
        }
    }

    if undated > 0 {
        tracing::warn!("{} articles without a usable timestamp left out of the time series", undated);
    }

    days.into_iter().map(|(date, acc)| acc.finish(date)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{NewsItem, SentimentResult};

    const DAY: i64 = 86_400;
    // 2024-01-02 00:00:00 UTC
    const JAN_2: i64 = 1_704_153_600;

    fn annotated(score: f64, published_at: Option<i64>) -> AnnotatedNewsItem {
        AnnotatedNewsItem {
            item: NewsItem {
                headline: format!("score {}", score),
                published_at,
                ..Default::default()
            },
            sentiment: SentimentResult {
                score,
                label: SentimentLabel::for_item(score),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize("AAPL", &[]);
        assert_eq!(summary.identifier, "AAPL");
        assert_eq!(summary.count, 0);
        assert_eq!(summary.avg_score, 0.0);
        assert_eq!(summary.overall_sentiment, SentimentLabel::Neutral);
        assert!(summary.time_series.is_empty());
        assert_eq!(summary.sentiment_distribution, SentimentDistribution::default());
    }

    #[test]
    fn test_distribution_and_boundary_label() {
        let mut items = Vec::new();
        items.extend((0..6).map(|_| annotated(0.5, Some(JAN_2))));
        items.extend((0..2).map(|_| annotated(-0.5, Some(JAN_2))));
        items.extend((0..2).map(|_| annotated(0.0, Some(JAN_2))));

        let summary = summarize("AAPL", &items);
        let dist = summary.sentiment_distribution;

        assert_eq!(summary.count, 10);
        assert_eq!(dist.positive.count, 6);
        assert!((dist.positive.percentage - 60.0).abs() < 1e-9);
        assert!((dist.negative.percentage - 20.0).abs() < 1e-9);
        assert!((dist.neutral.percentage - 20.0).abs() < 1e-9);
        assert!((summary.avg_score - 0.2).abs() < 1e-12);
        // exactly on the threshold resolves to positive
        assert_eq!(summary.overall_sentiment, SentimentLabel::Positive);
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let items: Vec<_> = [0.3, -0.7, 0.01, 0.9, -0.02, 0.06, -0.3]
            .iter()
            .map(|&s| annotated(s, None))
            .collect();
        let dist = summarize("MSFT", &items).sentiment_distribution;
        let sum = dist.positive.percentage + dist.negative.percentage + dist.neutral.percentage;
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_day_items_merge() {
        let items = vec![
            annotated(0.6, Some(JAN_2 + 3_600)),
            annotated(-0.2, Some(JAN_2 + 50_000)),
            annotated(0.0, Some(JAN_2 + DAY - 1)),
        ];
        let summary = summarize("TSLA", &items);

        assert_eq!(summary.time_series.len(), 1);
        let day = &summary.time_series[0];
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(day.count, 3);
        assert_eq!((day.positive, day.negative, day.neutral), (1, 1, 1));
        assert!((day.avg_score - 0.4 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_time_series_sorted_regardless_of_input_order() {
        let forward = vec![
            annotated(0.1, Some(JAN_2)),
            annotated(0.2, Some(JAN_2 + DAY)),
            annotated(0.3, Some(JAN_2 + 2 * DAY)),
            annotated(-0.4, Some(JAN_2 + DAY + 10)),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        let a = summarize("X", &forward).time_series;
        let b = summarize("X", &backward).time_series;

        assert_eq!(a.len(), 3);
        assert!(a.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.date, y.date);
            assert_eq!(x.count, y.count);
            assert!((x.avg_score - y.avg_score).abs() < 1e-12);
        }
        assert!((a[1].avg_score - (-0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_undated_items_counted_but_not_bucketed() {
        let items = vec![
            annotated(0.5, Some(JAN_2)),
            annotated(-0.5, None),
            annotated(-0.5, Some(0)),
        ];
        let summary = summarize("NVDA", &items);
        assert_eq!(summary.count, 3);
        assert!((summary.avg_score - (-0.5 / 3.0)).abs() < 1e-12);
        assert_eq!(summary.time_series.len(), 1);
        assert_eq!(summary.time_series[0].count, 1);
    }

    #[test]
    fn test_custom_threshold() {
        let items = vec![annotated(0.1, None), annotated(0.1, None)];
        assert_eq!(summarize("X", &items).overall_sentiment, SentimentLabel::Neutral);
        let loose = Aggregator::new(0.05).summarize("X", &items);
        assert_eq!(loose.overall_sentiment, SentimentLabel::Positive);
    }

    #[test]
    fn test_summarize_by_symbol() {
        let mut a = annotated(0.5, Some(JAN_2));
        a.item.related = vec!["AAPL".into(), "msft".into()];
        let mut b = annotated(-0.5, Some(JAN_2));
        b.item.related = vec!["MSFT".into()];
        let c = annotated(0.9, Some(JAN_2));

        let by_symbol = Aggregator::default().summarize_by_symbol(&[a, b, c]);
        assert_eq!(by_symbol.keys().collect::<Vec<_>>(), vec!["AAPL", "MSFT"]);
        assert_eq!(by_symbol["AAPL"].count, 1);
        assert_eq!(by_symbol["MSFT"].count, 2);
        assert_eq!(by_symbol["MSFT"].avg_score, 0.0);
    }

    #[test]
    fn test_symbol_listed_twice_counts_once() {
        let mut a = annotated(0.5, Some(JAN_2));
        a.item.related = vec!["MSFT".into(), "msft".into(), " ".into()];

        let by_symbol = Aggregator::default().summarize_by_symbol(&[a]);
        assert_eq!(by_symbol.len(), 1);
        assert_eq!(by_symbol["MSFT"].count, 1);
        assert_eq!(by_symbol["MSFT"].time_series[0].count, 1);
        assert_eq!(by_symbol["MSFT"].sentiment_distribution.positive.percentage, 100.0);
    }

    #[test]
    fn test_keyword_frequency() {
        let mut a = annotated(0.5, None);
        a.sentiment.keywords = vec!["earnings".into(), "stock".into(), "apple".into()];
        let mut b = annotated(0.1, None);
        b.sentiment.keywords = vec!["apple".into(), "market".into(), "iphone".into()];
        let mut c = annotated(-0.2, None);
        c.sentiment.keywords = vec!["apple".into(), "earnings".into()];

        let top = Aggregator::default().keyword_frequency(&[a, b, c], 2);
        assert_eq!(
            top,
            vec![
                KeywordCount { word: "apple".into(), count: 3 },
                KeywordCount { word: "earnings".into(), count: 2 },
            ]
        );

        let all = count_keywords(["news".to_string(), "updates".to_string()], 10);
        assert!(all.is_empty());
    }

    #[test]
    fn test_source_distribution() {
        let mut items: Vec<AnnotatedNewsItem> = Vec::new();
        for (source, n) in [("Reuters", 2), ("", 1), ("Bloomberg", 3)] {
            for _ in 0..n {
                let mut item = annotated(0.0, None);
                item.item.source = source.to_string();
                items.push(item);
            }
        }
        for i in 0..12 {
            let mut item = annotated(0.0, None);
            item.item.source = format!("Blog {}", i);
            items.push(item);
        }

        let sources = Aggregator::default().source_distribution(&items);
        assert_eq!(sources.len(), MAX_SOURCES);
        assert_eq!(sources[0], SourceCount { source: "Bloomberg".into(), count: 3 });
        assert_eq!(sources[1], SourceCount { source: "Reuters".into(), count: 2 });
        assert_eq!(sources[2], SourceCount { source: UNKNOWN_SOURCE.into(), count: 1 });
        assert_eq!(sources[3].source, "Blog 0");
    }

    #[test]
    fn test_summarize_by_category() {
        let mut a = annotated(0.5, None);
        a.item.category = Some("crypto".into());
        let b = annotated(-0.3, None);

        let by_category = Aggregator::default().summarize_by_category(&[a, b]);
        assert_eq!(by_category["crypto"].overall_sentiment, SentimentLabel::Positive);
        assert_eq!(by_category["general"].overall_sentiment, SentimentLabel::Negative);
    }

    #[test]
    fn test_symbol_snapshot() {
        let items = vec![annotated(0.333, None), annotated(0.111, None)];
        let snapshot = Aggregator::default().symbol_snapshot("AMZN", &items);
        assert_eq!(snapshot.average_sentiment, 0.22);
        assert_eq!(snapshot.sentiment_trend, SentimentLabel::Positive);
        assert_eq!(snapshot.news_count, 2);

        let empty = Aggregator::default().symbol_snapshot("AMZN", &[]);
        assert_eq!(empty.average_sentiment, 0.0);
        assert_eq!(empty.sentiment_trend, SentimentLabel::Neutral);
    }
}
