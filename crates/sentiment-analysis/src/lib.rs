use analysis_core::{
    AnalysisError, AnnotatedNewsItem, KeywordCount, NewsAnnotator, NewsItem, PolarityScores,
    SentimentAggregator, SentimentBreakdown, SentimentLabel, SentimentResult, SentimentSummary,
    SourceCount, SymbolSentiment,
};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

pub mod aggregate;
pub mod config;
pub mod keywords;
pub mod lexicon;
pub mod normalize;
pub mod vader;

pub use aggregate::{
    count_keywords, summarize, Aggregator, DEFAULT_TOP_KEYWORDS, GENERIC_NEWS_WORDS,
    HEADLINE_KEYWORDS, MAX_SOURCES, UNKNOWN_SOURCE,
};
pub use config::SentimentConfig;
pub use keywords::{extract_keywords, KeywordExtractor, DEFAULT_MAX_KEYWORDS, MIN_KEYWORD_LEN, SIMPLE_MIN_KEYWORD_LEN};
pub use lexicon::{Lexicon, FINANCIAL_TERMS};
pub use normalize::normalize;
pub use vader::VaderScorer;

/// Financial news sentiment pipeline: normalize, score, label, extract
/// keywords, aggregate.
///
/// Built once; all state is read-only afterwards, so one engine can be
/// shared across threads and batches.
pub struct SentimentAnalysisEngine {
    config: SentimentConfig,
    scorer: VaderScorer,
    keywords: KeywordExtractor,
    aggregator: Aggregator,
}

impl SentimentAnalysisEngine {
    /// Engine with default configuration and the full VADER lexicon.
    pub fn new() -> Result<Self, AnalysisError> {
        Self::with_config(SentimentConfig::default())
    }

    /// Engine configured from `SENTIMENT_*` environment variables.
    pub fn from_env() -> Result<Self, AnalysisError> {
        Self::with_config(SentimentConfig::from_env()?)
    }

    /// Load the general lexicon named by the config (or the bundled VADER one),
    /// overlay the financial terms and build the engine. Lexicon problems
    /// surface here and nowhere else.
    pub fn with_config(config: SentimentConfig) -> Result<Self, AnalysisError> {
        config.validate()?;

        let base = match &config.lexicon_path {
            Some(path) => {
                tracing::info!("Loading sentiment lexicon from {}", path.display());
                Lexicon::from_file(path)?
            }
            None => Lexicon::vader(),
        };
        let lexicon = Lexicon::merged(base, &Lexicon::financial());

        Self::with_lexicon(config, lexicon)
    }

    /// Build around an already merged lexicon. Rejects an invalid config.
    pub fn with_lexicon(config: SentimentConfig, lexicon: Lexicon) -> Result<Self, AnalysisError> {
        config.validate()?;

        tracing::info!(
            "Sentiment engine ready: {} lexicon terms, max {} keywords (min length > {})",
            lexicon.len(),
            config.max_keywords,
            config.min_keyword_len
        );

        Ok(Self {
            scorer: VaderScorer::new(Arc::new(lexicon)),
            keywords: KeywordExtractor::english(config.min_keyword_len),
            aggregator: Aggregator::new(config.aggregate_threshold),
            config,
        })
    }

    pub fn config(&self) -> &SentimentConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &Lexicon {
        self.scorer.lexicon()
    }

    /// Raw polarity scores for normalized text.
    pub fn score(&self, normalized_text: &str) -> PolarityScores {
        self.scorer.score(normalized_text)
    }

    pub fn label(&self, compound: f64) -> SentimentLabel {
        SentimentLabel::from_score(compound, self.config.item_threshold)
    }

    /// Keywords from normalized text using the configured stop words and
    /// minimum length.
    pub fn extract_keywords(&self, text: &str, max_keywords: usize) -> Vec<String> {
        self.keywords.extract(&normalize(text), max_keywords)
    }

    /// Full analysis of one piece of text. Empty text gives a neutral result.
    pub fn analyze_text(&self, text: &str) -> SentimentResult {
        let clean = normalize(text);
        if clean.is_empty() {
            return SentimentResult::neutral();
        }

        let scores = self.scorer.score(&clean);
        SentimentResult {
            score: scores.compound,
            label: self.label(scores.compound),
            breakdown: SentimentBreakdown::from(scores),
            keywords: self.keywords.extract(&clean, self.config.max_keywords),
        }
    }

    /// Attach sentiment to a news item, analysing `headline. summary`.
    pub fn annotate(&self, item: NewsItem) -> AnnotatedNewsItem {
        let sentiment = self.analyze_text(&item.analysis_text());
        AnnotatedNewsItem { item, sentiment }
    }

    /// Annotate every item independently on the rayon pool. Output order
    /// matches input order.
    pub fn annotate_batch(&self, items: Vec<NewsItem>) -> Vec<AnnotatedNewsItem> {
        tracing::debug!("Annotating {} news items", items.len());
        items.into_par_iter().map(|item| self.annotate(item)).collect()
    }

    pub fn summarize(&self, identifier: &str, items: &[AnnotatedNewsItem]) -> SentimentSummary {
        self.aggregator.summarize(identifier, items)
    }

    pub fn summarize_by_symbol(&self, items: &[AnnotatedNewsItem]) -> BTreeMap<String, SentimentSummary> {
        self.aggregator.summarize_by_symbol(items)
    }

    pub fn summarize_by_category(&self, items: &[AnnotatedNewsItem]) -> BTreeMap<String, SentimentSummary> {
        self.aggregator.summarize_by_category(items)
    }

    /// Most frequent keywords across `items`: each article's stored keywords
    /// plus up to [`HEADLINE_KEYWORDS`] taken from its headline again, with
    /// generic news words left out.
    pub fn keyword_frequency(&self, items: &[AnnotatedNewsItem], top_n: usize) -> Vec<KeywordCount> {
        let pooled = items.iter().flat_map(|i| {
            i.sentiment
                .keywords
                .iter()
                .cloned()
                .chain(self.extract_keywords(&i.item.headline, HEADLINE_KEYWORDS))
        });
        count_keywords(pooled, top_n)
    }

    pub fn source_distribution(&self, items: &[AnnotatedNewsItem]) -> Vec<SourceCount> {
        self.aggregator.source_distribution(items)
    }

    /// Snapshot for `symbol` over the items that mention it.
    pub fn symbol_snapshot(&self, symbol: &str, items: &[AnnotatedNewsItem]) -> SymbolSentiment {
        let relevant: Vec<AnnotatedNewsItem> = items
            .iter()
            .filter(|i| i.item.mentions(symbol))
            .cloned()
            .collect();
        self.aggregator.symbol_snapshot(symbol, &relevant)
    }
}

impl NewsAnnotator for SentimentAnalysisEngine {
    fn annotate(&self, item: NewsItem) -> AnnotatedNewsItem {
        SentimentAnalysisEngine::annotate(self, item)
    }

    fn annotate_batch(&self, items: Vec<NewsItem>) -> Vec<AnnotatedNewsItem> {
        SentimentAnalysisEngine::annotate_batch(self, items)
    }
}

impl SentimentAggregator for SentimentAnalysisEngine {
    fn summarize(&self, identifier: &str, items: &[AnnotatedNewsItem]) -> SentimentSummary {
        SentimentAnalysisEngine::summarize(self, identifier, items)
    }
}
