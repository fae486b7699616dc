//! Engine configuration
//!
//! Everything the pipeline is tuned by lives here and is handed to the engine
//! explicitly. `from_env` layers environment overrides on the defaults.

use analysis_core::{AnalysisError, AGGREGATE_LABEL_THRESHOLD, ITEM_LABEL_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::keywords::{DEFAULT_MAX_KEYWORDS, MIN_KEYWORD_LEN};

pub const ENV_MAX_KEYWORDS: &str = "SENTIMENT_MAX_KEYWORDS";
pub const ENV_MIN_KEYWORD_LEN: &str = "SENTIMENT_MIN_KEYWORD_LEN";
pub const ENV_LEXICON_PATH: &str = "SENTIMENT_LEXICON_PATH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// Keywords kept per article
    pub max_keywords: usize,
    /// Tokens must be longer than this to be keywords
    pub min_keyword_len: usize,
    /// Per-article label threshold
    pub item_threshold: f64,
    /// Threshold for the overall label of a summary
    pub aggregate_threshold: f64,
    /// General-purpose lexicon file. The bundled VADER lexicon is used when unset.
    pub lexicon_path: Option<PathBuf>,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            max_keywords: DEFAULT_MAX_KEYWORDS,
            min_keyword_len: MIN_KEYWORD_LEN,
            item_threshold: ITEM_LABEL_THRESHOLD,
            aggregate_threshold: AGGREGATE_LABEL_THRESHOLD,
            lexicon_path: None,
        }
    }
}

impl SentimentConfig {
    /// Defaults overridden by `SENTIMENT_*` environment variables.
    pub fn from_env() -> Result<Self, AnalysisError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AnalysisError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(max) = parse_var(&lookup, ENV_MAX_KEYWORDS)? {
            config.max_keywords = max;
        }
        if let Some(min_len) = parse_var(&lookup, ENV_MIN_KEYWORD_LEN)? {
            config.min_keyword_len = min_len;
        }
        if let Some(path) = lookup(ENV_LEXICON_PATH).filter(|p| !p.trim().is_empty()) {
            config.lexicon_path = Some(PathBuf::from(path.trim()));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        for (name, value) in [
            ("item_threshold", self.item_threshold),
            ("aggregate_threshold", self.aggregate_threshold),
        ] {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(AnalysisError::Config(format!(
                    "{} must be in (0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, AnalysisError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            tracing::warn!("Invalid configuration value {}={:?}", key, raw);
            AnalysisError::Config(format!("{} must be a non-negative integer, got {:?}", key, raw))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_constants() {
        let config = SentimentConfig::default();
        assert_eq!(config.max_keywords, 10);
        assert_eq!(config.min_keyword_len, 2);
        assert_eq!(config.item_threshold, 0.05);
        assert_eq!(config.aggregate_threshold, 0.2);
        assert!(config.lexicon_path.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = SentimentConfig::from_lookup(lookup_from(&[
            (ENV_MAX_KEYWORDS, "5"),
            (ENV_MIN_KEYWORD_LEN, " 1 "),
            (ENV_LEXICON_PATH, "/opt/lexicons/vader_lexicon.txt"),
        ]))
        .unwrap();

        assert_eq!(config.max_keywords, 5);
        assert_eq!(config.min_keyword_len, 1);
        assert_eq!(
            config.lexicon_path,
            Some(PathBuf::from("/opt/lexicons/vader_lexicon.txt"))
        );
    }

    #[test]
    fn test_missing_env_uses_defaults() {
        let config = SentimentConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, SentimentConfig::default());
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let err = SentimentConfig::from_lookup(lookup_from(&[(ENV_MAX_KEYWORDS, "ten")]))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn test_validate_thresholds() {
        let mut config = SentimentConfig::default();
        config.aggregate_threshold = 0.0;
        assert!(config.validate().is_err());

        config.aggregate_threshold = f64::NAN;
        assert!(config.validate().is_err());

        config.aggregate_threshold = 0.2;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: SentimentConfig = serde_json::from_str(r#"{"max_keywords": 3}"#).unwrap();
        assert_eq!(config.max_keywords, 3);
        assert_eq!(config.aggregate_threshold, AGGREGATE_LABEL_THRESHOLD);
    }
}
