//! Valence-aware rule-based scorer (VADER)
//!
//! Per-token valences come from a [`Lexicon`]; the usual VADER heuristics
//! adjust them: boosters and dampeners, ALL-CAPS emphasis, negation within a
//! three-token window, "least", special-case idioms, but-clauses and
//! `!`/`?` emphasis. The summed valence is squashed into [-1, 1].

use analysis_core::stats::round_to;
use analysis_core::{PolarityScorer, PolarityScores};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use crate::lexicon::Lexicon;

// Empirically derived scaling constants from the VADER paper
const B_INCR: f64 = 0.293;
const B_DECR: f64 = -0.293;
const C_INCR: f64 = 0.733;
const N_SCALAR: f64 = -0.74;

const EMARK_INCR: f64 = 0.292;
const QMARK_INCR: f64 = 0.18;
const MAX_EMARK: usize = 4;
const MAX_QMARK: usize = 3;
const QMARK_CAP: f64 = 0.96;

const NORMALIZATION_ALPHA: f64 = 15.0;

const NEGATE: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt",
    "ain't", "aren't", "can't", "couldn't", "daren't", "didn't", "doesn't",
    "dont", "hadnt", "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither",
    "don't", "hadn't", "hasn't", "haven't", "isn't", "mightn't", "mustn't",
    "neednt", "needn't", "never", "none", "nope", "nor", "not", "nothing", "nowhere",
    "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent",
    "oughtn't", "shan't", "shouldn't", "uh-uh", "wasn't", "weren't",
    "without", "wont", "wouldnt", "won't", "wouldn't", "rarely", "seldom", "despite",
];

static BOOSTER_DICT: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    let increments = [
        "absolutely", "amazingly", "awfully", "completely", "considerable", "considerably",
        "decidedly", "deeply", "effing", "enormous", "enormously", "entirely", "especially",
        "exceptional", "exceptionally", "extreme", "extremely", "fabulously", "flipping",
        "flippin", "frackin", "fracking", "fricking", "frickin", "frigging", "friggin",
        "fully", "fuckin", "fucking", "fuggin", "fugging", "greatly", "hella", "highly",
        "hugely", "incredible", "incredibly", "intensely", "major", "majorly", "more", "most",
        "particularly", "purely", "quite", "really", "remarkably", "so", "substantially",
        "thoroughly", "total", "totally", "tremendous", "tremendously", "uber",
        "unbelievably", "unusually", "utter", "utterly", "very",
    ];
    let decrements = [
        "almost", "barely", "hardly", "just enough", "kind of", "kinda", "kindof", "kind-of",
        "less", "little", "marginal", "marginally", "occasional", "occasionally", "partly",
        "scarce", "scarcely", "slight", "slightly", "somewhat", "sort of", "sorta", "sortof",
        "sort-of",
    ];

    increments
        .into_iter()
        .map(|w| (w, B_INCR))
        .chain(decrements.into_iter().map(|w| (w, B_DECR)))
        .collect()
});

static SPECIAL_CASE_IDIOMS: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    HashMap::from([
        ("the shit", 3.0),
        ("the bomb", 3.0),
        ("bad ass", 1.5),
        ("badass", 1.5),
        ("bus stop", 0.0),
        ("yeah right", -2.0),
        ("kiss of death", -1.5),
        ("to die for", 3.0),
        ("beating heart", 3.1),
        ("broken heart", -2.9),
        ("cut the mustard", 2.0),
        ("hand to mouth", -2.0),
    ])
});

/// VADER scorer over an immutable, shared lexicon
#[derive(Debug, Clone)]
pub struct VaderScorer {
    lexicon: Arc<Lexicon>,
}

impl VaderScorer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Compound score plus positive/negative/neutral proportions.
    ///
    /// Compound is rounded to four decimals and the proportions to three.
    /// Text without tokens scores as fully neutral.
    pub fn score(&self, text: &str) -> PolarityScores {
        let words = tokenize(text);
        if words.is_empty() {
            return PolarityScores::neutral();
        }

        let lower: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let is_cap_diff = allcap_differential(&words);

        let mut sentiments = Vec::with_capacity(words.len());
        for i in 0..words.len() {
            let word = lower[i].as_str();
            // boosters carry no valence of their own; "kind of" is a dampener
            let kind_of = word == "kind" && lower.get(i + 1).is_some_and(|next| next == "of");
            if BOOSTER_DICT.contains_key(word) || kind_of {
                sentiments.push(0.0);
                continue;
            }
            sentiments.push(self.sentiment_valence(&words, &lower, i, is_cap_diff));
        }

        but_check(&lower, &mut sentiments);
        score_valence(&sentiments, text)
    }

    fn sentiment_valence(&self, words: &[&str], lower: &[String], i: usize, is_cap_diff: bool) -> f64 {
        let item = lower[i].as_str();
        let Some(base) = self.lexicon.get(item) else {
            return 0.0;
        };
        let mut valence = base;

        // "no" directly before another lexicon word acts as a negator, not a word
        if item == "no" && lower.get(i + 1).is_some_and(|next| self.lexicon.contains(next)) {
            valence = 0.0;
        }
        if (i > 0 && lower[i - 1] == "no")
            || (i > 1 && lower[i - 2] == "no")
            || (i > 2 && lower[i - 3] == "no" && matches!(lower[i - 1].as_str(), "or" | "nor"))
        {
            valence = base * N_SCALAR;
        }

        if is_cap_diff && is_upper(words[i]) {
            if valence > 0.0 {
                valence += C_INCR;
            } else {
                valence -= C_INCR;
            }
        }

        for start_i in 0..3 {
            let j = i.wrapping_sub(start_i + 1);
            if i > start_i && !self.lexicon.contains(&lower[j]) {
                let mut s = scalar_inc_dec(words[j], &lower[j], valence, is_cap_diff);
                if start_i == 1 && s != 0.0 {
                    s *= 0.95;
                }
                if start_i == 2 && s != 0.0 {
                    s *= 0.9;
                }
                valence += s;
                valence = negation_check(valence, lower, start_i, i);
                if start_i == 2 {
                    valence = special_idioms_check(valence, lower, i);
                }
            }
        }

        self.least_check(valence, lower, i)
    }

    fn least_check(&self, valence: f64, lower: &[String], i: usize) -> f64 {
        if i > 1 && lower[i - 1] == "least" && !self.lexicon.contains(&lower[i - 1]) {
            if lower[i - 2] != "at" && lower[i - 2] != "very" {
                return valence * N_SCALAR;
            }
        } else if i > 0 && lower[i - 1] == "least" && !self.lexicon.contains(&lower[i - 1]) {
            return valence * N_SCALAR;
        }
        valence
    }
}

impl PolarityScorer for VaderScorer {
    fn polarity_scores(&self, text: &str) -> PolarityScores {
        self.score(text)
    }
}

/// Whitespace split; surrounding punctuation is dropped unless that would
/// leave two characters or fewer (keeps emoticons such as `:)` intact).
fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|token| {
            let stripped = token.trim_matches(|c: char| c.is_ascii_punctuation());
            if stripped.chars().count() <= 2 {
                token
            } else {
                stripped
            }
        })
        .collect()
}

fn is_upper(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

/// True when some, but not all, tokens are ALL CAPS.
fn allcap_differential(words: &[&str]) -> bool {
    let allcaps = words.iter().filter(|w| is_upper(w)).count();
    allcaps > 0 && allcaps < words.len()
}

fn negated(word: &str) -> bool {
    NEGATE.contains(&word) || word.contains("n't")
}

fn scalar_inc_dec(word: &str, word_lower: &str, valence: f64, is_cap_diff: bool) -> f64 {
    let Some(&boost) = BOOSTER_DICT.get(word_lower) else {
        return 0.0;
    };
    let mut scalar = if valence < 0.0 { -boost } else { boost };
    if is_cap_diff && is_upper(word) {
        if valence > 0.0 {
            scalar += C_INCR;
        } else {
            scalar -= C_INCR;
        }
    }
    scalar
}

fn negation_check(valence: f64, lower: &[String], start_i: usize, i: usize) -> f64 {
    let at = |offset: usize| lower[i - offset].as_str();
    let so_or_this = |w: &str| w == "so" || w == "this";

    match start_i {
        0 => {
            if negated(at(1)) {
                return valence * N_SCALAR;
            }
        }
        1 => {
            if at(2) == "never" && so_or_this(at(1)) {
                return valence * 1.25;
            } else if at(2) == "without" && at(1) == "doubt" {
                return valence;
            } else if negated(at(2)) {
                return valence * N_SCALAR;
            }
        }
        2 => {
            if at(3) == "never" && (so_or_this(at(2)) || so_or_this(at(1))) {
                return valence * 1.25;
            } else if at(3) == "without" && (at(2) == "doubt" || at(1) == "doubt") {
                return valence;
            } else if negated(at(3)) {
                return valence * N_SCALAR;
            }
        }
        _ => {}
    }
    valence
}

/// Only called with `i >= 3`.
fn special_idioms_check(mut valence: f64, lower: &[String], i: usize) -> f64 {
    let w = |idx: usize| lower[idx].as_str();

    let onezero = format!("{} {}", w(i - 1), w(i));
    let twoonezero = format!("{} {} {}", w(i - 2), w(i - 1), w(i));
    let twoone = format!("{} {}", w(i - 2), w(i - 1));
    let threetwoone = format!("{} {} {}", w(i - 3), w(i - 2), w(i - 1));
    let threetwo = format!("{} {}", w(i - 3), w(i - 2));

    for seq in [&onezero, &twoonezero, &twoone, &threetwoone, &threetwo] {
        if let Some(&v) = SPECIAL_CASE_IDIOMS.get(seq.as_str()) {
            valence = v;
            break;
        }
    }

    if lower.len() > i + 1 {
        let zeroone = format!("{} {}", w(i), w(i + 1));
        if let Some(&v) = SPECIAL_CASE_IDIOMS.get(zeroone.as_str()) {
            valence = v;
        }
    }
    if lower.len() > i + 2 {
        let zeroonetwo = format!("{} {} {}", w(i), w(i + 1), w(i + 2));
        if let Some(&v) = SPECIAL_CASE_IDIOMS.get(zeroonetwo.as_str()) {
            valence = v;
        }
    }

    // booster/dampener bigrams such as "sort of"
    for ngram in [&threetwoone, &threetwo, &twoone] {
        if let Some(&b) = BOOSTER_DICT.get(ngram.as_str()) {
            valence += b;
        }
    }

    valence
}

/// Everything before the first "but" is halved, everything after weighted 1.5x.
fn but_check(lower: &[String], sentiments: &mut [f64]) {
    let Some(bi) = lower.iter().position(|w| w == "but") else {
        return;
    };
    for (si, sentiment) in sentiments.iter_mut().enumerate() {
        if si < bi {
            *sentiment *= 0.5;
        } else if si > bi {
            *sentiment *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let ep_count = text.matches('!').count().min(MAX_EMARK);
    let ep_amplifier = ep_count as f64 * EMARK_INCR;

    let qm_count = text.matches('?').count();
    let qm_amplifier = if qm_count > 1 {
        if qm_count <= MAX_QMARK {
            qm_count as f64 * QMARK_INCR
        } else {
            QMARK_CAP
        }
    } else {
        0.0
    };

    ep_amplifier + qm_amplifier
}

/// Squash an unbounded valence sum into [-1, 1].
fn normalize_score(score: f64) -> f64 {
    (score / (score * score + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn sift_sentiment_scores(sentiments: &[f64]) -> (f64, f64, usize) {
    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0;
    for &s in sentiments {
        // +/-1 compensates for neutral words being counted as 1
        if s > 0.0 {
            pos_sum += s + 1.0;
        } else if s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neu_count += 1;
        }
    }
    (pos_sum, neg_sum, neu_count)
}

fn score_valence(sentiments: &[f64], text: &str) -> PolarityScores {
    if sentiments.is_empty() {
        return PolarityScores::neutral();
    }

    let punct = punctuation_emphasis(text);
    let mut sum_s: f64 = sentiments.iter().sum();
    if sum_s > 0.0 {
        sum_s += punct;
    } else if sum_s < 0.0 {
        sum_s -= punct;
    }
    let compound = normalize_score(sum_s);

    let (mut pos_sum, mut neg_sum, neu_count) = sift_sentiment_scores(sentiments);
    if pos_sum > neg_sum.abs() {
        pos_sum += punct;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= punct;
    }

    let total = pos_sum + neg_sum.abs() + neu_count as f64;
    if total <= 0.0 {
        return PolarityScores::neutral();
    }

    PolarityScores {
        compound: round_to(compound, 4),
        positive: round_to((pos_sum / total).abs(), 3),
        negative: round_to((neg_sum / total).abs(), 3),
        neutral: round_to(neu_count as f64 / total, 3),
    }
}
