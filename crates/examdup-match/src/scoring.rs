//! Combined similarity score and confidence classification.

use crate::metrics::{
    cosine_similarity, fuzzy_token_match, jaccard_similarity, levenshtein_similarity,
};
use crate::normalize::content_tokens;
use serde::{Deserialize, Serialize};

/// Weight of token-frequency cosine similarity in the combined score.
pub const COSINE_WEIGHT: f64 = 0.40;
/// Weight of token-set Jaccard similarity in the combined score.
pub const JACCARD_WEIGHT: f64 = 0.30;
/// Weight of character edit-distance similarity in the combined score.
pub const LEVENSHTEIN_WEIGHT: f64 = 0.30;

/// Lowest combined score classified as [`Confidence::High`].
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.85;
/// Lowest combined score classified as [`Confidence::Medium`].
pub const MEDIUM_CONFIDENCE_THRESHOLD: f64 = 0.70;

/// How strongly a combined score indicates a reused question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Classify a combined score. Boundaries are inclusive on the high side.
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_CONFIDENCE_THRESHOLD {
            Confidence::High
        } else if score >= MEDIUM_CONFIDENCE_THRESHOLD {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "HIGH",
            Confidence::Medium => "MEDIUM",
            Confidence::Low => "LOW",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Blend the three metrics of two normalized texts into one score.
///
/// Returns 0 without running any metric when either text is empty.
pub fn calculate_text_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let combined = COSINE_WEIGHT * cosine_similarity(a, b)
        + JACCARD_WEIGHT * jaccard_similarity(a, b)
        + LEVENSHTEIN_WEIGHT * levenshtein_similarity(a, b);

    round2(combined)
}

/// Per-metric view of one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub cosine: f64,
    pub jaccard: f64,
    pub levenshtein: f64,
    /// Fuzzy token overlap. Reported only, not part of `combined`.
    pub fuzzy_tokens: f64,
    pub combined: f64,
}

/// Compute every metric for two normalized texts.
pub fn score_breakdown(a: &str, b: &str) -> ScoreBreakdown {
    ScoreBreakdown {
        cosine: round2(cosine_similarity(a, b)),
        jaccard: round2(jaccard_similarity(a, b)),
        levenshtein: round2(levenshtein_similarity(a, b)),
        fuzzy_tokens: round2(fuzzy_token_match(&content_tokens(a), &content_tokens(b))),
        combined: calculate_text_similarity(a, b),
    }
}
