//! Examdup Match - Text similarity matching for scanned exam questions.
//!
//! The pipeline runs in one direction:
//! - normalize raw OCR text
//! - score it against every stored question (cosine, Jaccard, edit distance)
//! - blend the scores, threshold and rank them
//! - summarize the ranked matches in a report
//!
//! Everything here is pure and synchronous. Storage and OCR live in other
//! crates; callers pass a corpus snapshot in and get a [`MatchOutcome`] back.

mod matcher;
mod metrics;
mod normalize;
mod report;
mod scoring;

pub use matcher::{
    match_corpus, MatchCandidate, MatchOutcome, NearMiss, MATCH_PREVIEW_CHARS,
    NEAR_MISS_LIMIT, NEAR_MISS_PREVIEW_CHARS, SUGGESTION_MARGIN,
};
pub use metrics::{
    cosine_similarity, fuzzy_token_match, jaccard_similarity, levenshtein_similarity,
    FUZZY_TOKEN_THRESHOLD,
};
pub use normalize::{clean_text_for_comparison, content_tokens, extract_tokens, normalize, tokens};
pub use report::{generate_report, ExamCodeCount, MatchReport, REPORT_PREVIEW_LIMIT};
pub use scoring::{
    calculate_text_similarity, round2, score_breakdown, Confidence, ScoreBreakdown,
    COSINE_WEIGHT, HIGH_CONFIDENCE_THRESHOLD, JACCARD_WEIGHT, LEVENSHTEIN_WEIGHT,
    MEDIUM_CONFIDENCE_THRESHOLD,
};
