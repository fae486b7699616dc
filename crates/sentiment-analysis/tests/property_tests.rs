//! Property tests for the sentiment pipeline.
//!
//! Uses proptest to verify:
//! 1. Normalization is idempotent
//! 2. Scores stay in range and breakdowns sum to one
//! 3. Labels are a pure function of the score
//! 4. Keywords respect the stop-word, length and size limits
//! 5. The daily time series does not depend on input order

use analysis_core::{
    AnnotatedNewsItem, NewsItem, SentimentLabel, SentimentResult, ITEM_LABEL_THRESHOLD,
};
use proptest::prelude::*;
use sentiment_analysis::keywords::ENGLISH_STOP_WORDS;
use sentiment_analysis::{normalize, summarize, KeywordExtractor, SentimentAnalysisEngine, MIN_KEYWORD_LEN};
use std::sync::LazyLock;

static ENGINE: LazyLock<SentimentAnalysisEngine> =
    LazyLock::new(|| SentimentAnalysisEngine::new().expect("default engine builds"));

// ── Strategies ───────────────────────────────────────────────────────

fn arb_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("www.".to_string()),
        Just("http://".to_string()),
        Just("https://".to_string()),
        Just(",".to_string()),
        Just("!".to_string()),
        Just("?".to_string()),
        Just(" ".to_string()),
        Just("\t".to_string()),
        Just("not".to_string()),
        Just("but".to_string()),
        Just("very".to_string()),
        Just("crash".to_string()),
        Just("growth".to_string()),
        Just("good".to_string()),
        Just("bad".to_string()),
        "[a-zA-Z0-9$%.]{1,8}",
    ]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::collection::vec(arb_fragment(), 0..40).prop_map(|parts| parts.join("")),
        prop::collection::vec(arb_fragment(), 0..40).prop_map(|parts| parts.join(" ")),
        "[ -~\t\n]{0,200}",
    ]
}

fn arb_timestamp() -> impl Strategy<Value = Option<i64>> {
    prop_oneof![
        1 => Just(None),
        // one week starting 2024-01-01 UTC
        6 => (1_704_067_200i64..1_704_672_000).prop_map(Some),
    ]
}

fn arb_annotated() -> impl Strategy<Value = AnnotatedNewsItem> {
    (-1.0..=1.0_f64, arb_timestamp()).prop_map(|(score, published_at)| AnnotatedNewsItem {
        item: NewsItem {
            published_at,
            ..Default::default()
        },
        sentiment: SentimentResult {
            score,
            label: SentimentLabel::for_item(score),
            ..Default::default()
        },
    })
}

// ── 1. Normalization ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn normalize_is_idempotent(text in arb_text()) {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalized_text_has_no_disallowed_chars(text in arb_text()) {
        let clean = normalize(&text);
        prop_assert!(clean.chars().all(|c| c.is_alphanumeric() || c == '_' || c == ' ' || "$%.".contains(c)));
        prop_assert!(!clean.contains("  "));
        prop_assert_eq!(clean.trim(), clean.as_str());
    }
}

// ── 2 & 3. Scores and labels ─────────────────────────────────────────

proptest! {
    #[test]
    fn scores_in_range(text in arb_text()) {
        let result = ENGINE.analyze_text(&text);
        prop_assert!((-1.0..=1.0).contains(&result.score));

        let b = result.breakdown;
        for part in [b.positive, b.negative, b.neutral] {
            prop_assert!((0.0..=1.0).contains(&part));
        }
        prop_assert!((b.positive + b.negative + b.neutral - 1.0).abs() <= 0.01);
    }

    #[test]
    fn label_follows_score(text in arb_text()) {
        let result = ENGINE.analyze_text(&text);
        prop_assert_eq!(result.label, SentimentLabel::for_item(result.score));
    }

    #[test]
    fn label_thresholds(score in -1.0..=1.0_f64) {
        let label = SentimentLabel::for_item(score);
        let expected = if score >= ITEM_LABEL_THRESHOLD {
            SentimentLabel::Positive
        } else if score <= -ITEM_LABEL_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        prop_assert_eq!(label, expected);
    }
}

// ── 4. Keywords ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn keywords_respect_limits(text in arb_text(), max in 0usize..15) {
        let extractor = KeywordExtractor::default();
        let keywords = extractor.extract(&normalize(&text), max);

        prop_assert!(keywords.len() <= max);
        for (i, keyword) in keywords.iter().enumerate() {
            prop_assert!(keyword.chars().count() > MIN_KEYWORD_LEN);
            prop_assert!(!ENGLISH_STOP_WORDS.contains(&keyword.as_str()));
            prop_assert!(!keywords[..i].contains(keyword));
        }
    }
}

// ── 5. Aggregation ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn time_series_independent_of_order(
        items in prop::collection::vec(arb_annotated(), 0..40),
        rotate in 0usize..40,
    ) {
        let mut shuffled = items.clone();
        shuffled.reverse();
        if !shuffled.is_empty() {
            let k = rotate % shuffled.len();
            shuffled.rotate_left(k);
        }

        let a = summarize("SYM", &items);
        let b = summarize("SYM", &shuffled);

        prop_assert_eq!(a.count, b.count);
        prop_assert_eq!(a.sentiment_distribution.positive.count, b.sentiment_distribution.positive.count);
        prop_assert_eq!(a.time_series.len(), b.time_series.len());
        prop_assert!(a.time_series.windows(2).all(|w| w[0].date < w[1].date));

        for (x, y) in a.time_series.iter().zip(&b.time_series) {
            prop_assert_eq!(x.date, y.date);
            prop_assert_eq!(x.count, y.count);
            prop_assert_eq!((x.positive, x.negative, x.neutral), (y.positive, y.negative, y.neutral));
            prop_assert!((x.avg_score - y.avg_score).abs() < 1e-9);
        }

        let dated = items.iter().filter(|i| i.item.published_date().is_some()).count();
        prop_assert_eq!(a.time_series.iter().map(|d| d.count).sum::<usize>(), dated);
    }

    #[test]
    fn percentages_sum_to_hundred(items in prop::collection::vec(arb_annotated(), 1..40)) {
        let d = summarize("SYM", &items).sentiment_distribution;
        prop_assert!((d.positive.percentage + d.negative.percentage + d.neutral.percentage - 100.0).abs() < 1e-9);
    }
}
