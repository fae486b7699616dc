use crate::{AnnotatedNewsItem, NewsItem, PolarityScores, SentimentSummary};

/// Trait for text polarity scorers
pub trait PolarityScorer: Send + Sync {
    /// Score already-normalized text. Empty text is a neutral success.
    fn polarity_scores(&self, text: &str) -> PolarityScores;
}

/// Trait for engines that attach sentiment to news items
pub trait NewsAnnotator: Send + Sync {
    fn annotate(&self, item: NewsItem) -> AnnotatedNewsItem;

    fn annotate_batch(&self, items: Vec<NewsItem>) -> Vec<AnnotatedNewsItem> {
        items.into_iter().map(|item| self.annotate(item)).collect()
    }
}

/// Trait for sentiment aggregators
pub trait SentimentAggregator: Send + Sync {
    fn summarize(&self, identifier: &str, items: &[AnnotatedNewsItem]) -> SentimentSummary;
}
