use serde::{Deserialize, Serialize};
use std::fmt;

/// Topic of a news article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsCategory {
    Earnings,
    MergerAcquisition,
    ProductLaunch,
    Leadership,
    Regulatory,
    MarketOutlook,
    EconomicIndicator,
    General,
}

impl NewsCategory {
    /// Categories that are scored, in tie-break order.
    pub const SCORED: [NewsCategory; 7] = [
        NewsCategory::Earnings,
        NewsCategory::MergerAcquisition,
        NewsCategory::ProductLaunch,
        NewsCategory::Leadership,
        NewsCategory::Regulatory,
        NewsCategory::MarketOutlook,
        NewsCategory::EconomicIndicator,
    ];

    /// Lowercase cue phrases; each one found in the text adds a point.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            NewsCategory::Earnings => &[
                "earnings", "revenue", "profit", "quarter", "quarterly", "eps", "beat", "miss",
            ],
            NewsCategory::MergerAcquisition => &[
                "merger", "acquisition", "acquire", "takeover", "bid", "buyout", "deal",
            ],
            NewsCategory::ProductLaunch => &[
                "launch", "unveil", "announce", "release", "new product", "new service",
            ],
            NewsCategory::Leadership => &[
                "ceo", "cfo", "executive", "board", "appoint", "resign", "leadership",
            ],
            NewsCategory::Regulatory => &[
                "sec", "regulation", "lawsuit", "legal", "compliance", "investigation", "fine",
            ],
            NewsCategory::MarketOutlook => &[
                "outlook", "forecast", "guidance", "predict", "expect", "projection",
            ],
            NewsCategory::EconomicIndicator => &[
                "inflation", "unemployment", "gdp", "growth", "recession", "fed", "rate",
            ],
            NewsCategory::General => &[],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::Earnings => "earnings",
            NewsCategory::MergerAcquisition => "merger_acquisition",
            NewsCategory::ProductLaunch => "product_launch",
            NewsCategory::Leadership => "leadership",
            NewsCategory::Regulatory => "regulatory",
            NewsCategory::MarketOutlook => "market_outlook",
            NewsCategory::EconomicIndicator => "economic_indicator",
            NewsCategory::General => "general",
        }
    }

    fn score(&self, text: &str) -> usize {
        self.keywords().iter().filter(|k| text.contains(*k)).count()
    }
}

impl fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categories whose cue phrases occur in headline and content, strongest
/// first. Matching is by substring, so "fine" also hits "finest". Falls back
/// to `[General]`.
pub fn categorize(headline: &str, content: &str) -> Vec<NewsCategory> {
    let text = format!("{} {}", headline, content).to_lowercase();

    let mut scored: Vec<(NewsCategory, usize)> = NewsCategory::SCORED
        .iter()
        .map(|c| (*c, c.score(&text)))
        .filter(|(_, score)| *score > 0)
        .collect();

    if scored.is_empty() {
        return vec![NewsCategory::General];
    }

    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.into_iter().map(|(c, _)| c).collect()
}
