//! Matching a query text against a corpus of stored questions.

use crate::normalize::normalize;
use crate::scoring::{calculate_text_similarity, Confidence};
use chrono::{DateTime, Utc};
use examdup_core::CorpusEntry;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Amount subtracted from the best near-miss score to suggest a threshold.
pub const SUGGESTION_MARGIN: f64 = 0.10;

/// Number of near-misses reported when nothing clears the threshold.
pub const NEAR_MISS_LIMIT: usize = 3;

/// Characters of matched text carried in a candidate.
pub const MATCH_PREVIEW_CHARS: usize = 300;

/// Characters of text carried in a near-miss.
pub const NEAR_MISS_PREVIEW_CHARS: usize = 100;

/// A stored question that cleared the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub question_id: String,
    pub exam_code: String,
    pub score: f64,
    pub confidence: Confidence,
    pub matched_text_preview: String,
    pub image_url: String,
    pub uploaded_at: DateTime<Utc>,
}

impl MatchCandidate {
    fn new(entry: &CorpusEntry, score: f64) -> Self {
        Self {
            question_id: entry.id.clone(),
            exam_code: entry.exam_code.clone(),
            score,
            confidence: Confidence::from_score(score),
            matched_text_preview: preview(&entry.raw_text, MATCH_PREVIEW_CHARS),
            image_url: entry.image_url.clone(),
            uploaded_at: entry.created_at,
        }
    }
}

/// A best-scoring stored question that did not clear the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearMiss {
    pub question_id: String,
    pub exam_code: String,
    pub score: f64,
    pub text_preview: String,
}

impl NearMiss {
    fn new(entry: &CorpusEntry, score: f64) -> Self {
        Self {
            question_id: entry.id.clone(),
            exam_code: entry.exam_code.clone(),
            score,
            text_preview: preview(&entry.raw_text, NEAR_MISS_PREVIEW_CHARS),
        }
    }
}

/// Result of matching one query against a corpus snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchOutcome {
    /// At least one stored question cleared the threshold.
    Success {
        results: Vec<MatchCandidate>,
        top_match: MatchCandidate,
    },
    /// Nothing cleared the threshold; the closest entries are reported.
    NoConfirmedMatch {
        reason: String,
        threshold: f64,
        suggested_threshold: f64,
        debug_info: Vec<NearMiss>,
    },
    /// The query normalized to nothing.
    NoMatch { reason: String, ocr_output: String },
    /// There was nothing to compare against.
    NoMatchesInCorpus { reason: String },
}

impl MatchOutcome {
    /// Status label as used in reports and JSON output.
    pub fn status(&self) -> &'static str {
        match self {
            MatchOutcome::Success { .. } => "SUCCESS",
            MatchOutcome::NoConfirmedMatch { .. } => "NO_CONFIRMED_MATCH",
            MatchOutcome::NoMatch { .. } => "NO_MATCH",
            MatchOutcome::NoMatchesInCorpus { .. } => "NO_MATCHES_IN_CORPUS",
        }
    }

    /// Confirmed matches, best first. Empty unless the outcome is a success.
    pub fn results(&self) -> &[MatchCandidate] {
        match self {
            MatchOutcome::Success { results, .. } => results,
            _ => &[],
        }
    }

    pub fn top_match(&self) -> Option<&MatchCandidate> {
        match self {
            MatchOutcome::Success { top_match, .. } => Some(top_match),
            _ => None,
        }
    }

    pub fn suggested_threshold(&self) -> Option<f64> {
        match self {
            MatchOutcome::NoConfirmedMatch {
                suggested_threshold,
                ..
            } => Some(*suggested_threshold),
            _ => None,
        }
    }

    pub fn debug_info(&self) -> &[NearMiss] {
        match self {
            MatchOutcome::NoConfirmedMatch { debug_info, .. } => debug_info,
            _ => &[],
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            MatchOutcome::Success { .. } => None,
            MatchOutcome::NoConfirmedMatch { reason, .. }
            | MatchOutcome::NoMatch { reason, .. }
            | MatchOutcome::NoMatchesInCorpus { reason } => Some(reason),
        }
    }
}

/// Score a raw query text against every corpus entry and rank the hits.
///
/// Entries with a combined score at or above `threshold` are returned best
/// first. Equal scores keep their corpus order. When nothing qualifies, the
/// top [`NEAR_MISS_LIMIT`] entries are reported along with a suggested
/// threshold of `best score - SUGGESTION_MARGIN`, which is not clamped.
///
/// The corpus is only read; every candidate is a new value.
pub fn match_corpus(query_raw_text: &str, corpus: &[CorpusEntry], threshold: f64) -> MatchOutcome {
    if corpus.is_empty() {
        return MatchOutcome::NoMatchesInCorpus {
            reason: "No questions in database to compare against".to_string(),
        };
    }

    let query = normalize(query_raw_text);
    if query.is_empty() {
        return MatchOutcome::NoMatch {
            reason: "Could not extract text from uploaded image".to_string(),
            ocr_output: query_raw_text.to_string(),
        };
    }

    // Stored text is normalized here on every call, never read from a cache.
    let mut scored: Vec<(&CorpusEntry, f64)> = corpus
        .iter()
        .map(|entry| {
            let stored = normalize(&entry.raw_text);
            (entry, calculate_text_similarity(&query, &stored))
        })
        .collect();

    let mut confirmed: Vec<MatchCandidate> = scored
        .iter()
        .filter(|(_, score)| *score >= threshold)
        .map(|(entry, score)| MatchCandidate::new(entry, *score))
        .collect();

    debug!(
        "Scored {} stored questions, {} at or above threshold {}",
        corpus.len(),
        confirmed.len(),
        threshold
    );

    if !confirmed.is_empty() {
        // sort_by is stable, so ties stay in corpus order.
        confirmed.sort_by(|a, b| b.score.total_cmp(&a.score));
        let top_match = confirmed[0].clone();
        return MatchOutcome::Success {
            results: confirmed,
            top_match,
        };
    }

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    let best_score = scored.first().map(|(_, score)| *score).unwrap_or(0.0);

    MatchOutcome::NoConfirmedMatch {
        reason: format!(
            "No matches found above text similarity threshold ({})",
            threshold
        ),
        threshold,
        suggested_threshold: best_score - SUGGESTION_MARGIN,
        debug_info: scored
            .iter()
            .take(NEAR_MISS_LIMIT)
            .map(|(entry, score)| NearMiss::new(entry, *score))
            .collect(),
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
