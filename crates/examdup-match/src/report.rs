//! Summary report over a ranked match list.

use crate::matcher::MatchCandidate;
use crate::scoring::Confidence;
use serde::{Deserialize, Serialize};

/// Number of matches carried in a report preview.
pub const REPORT_PREVIEW_LIMIT: usize = 10;

/// Number of matches under one exam code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamCodeCount {
    pub exam_code: String,
    pub count: usize,
}

/// Aggregated view of a ranked match list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub total_matches: usize,
    pub high_confidence_matches: usize,
    pub medium_confidence_matches: usize,
    pub low_confidence_matches: usize,
    /// Exam codes in the order they first appear in the match list.
    pub exam_code_breakdown: Vec<ExamCodeCount>,
    /// The first matches of the list, in the order given.
    pub matches: Vec<MatchCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

impl MatchReport {
    fn empty() -> Self {
        Self {
            total_matches: 0,
            high_confidence_matches: 0,
            medium_confidence_matches: 0,
            low_confidence_matches: 0,
            exam_code_breakdown: Vec::new(),
            matches: Vec::new(),
            report: Some("No matches found".to_string()),
        }
    }
}

/// Summarize matches that are already ranked best first.
pub fn generate_report(matches: &[MatchCandidate]) -> MatchReport {
    if matches.is_empty() {
        return MatchReport::empty();
    }

    let count_of = |confidence: Confidence| {
        matches
            .iter()
            .filter(|m| m.confidence == confidence)
            .count()
    };

    let mut exam_code_breakdown: Vec<ExamCodeCount> = Vec::new();
    for candidate in matches {
        match exam_code_breakdown
            .iter_mut()
            .find(|entry| entry.exam_code == candidate.exam_code)
        {
            Some(entry) => entry.count += 1,
            None => exam_code_breakdown.push(ExamCodeCount {
                exam_code: candidate.exam_code.clone(),
                count: 1,
            }),
        }
    }

    MatchReport {
        total_matches: matches.len(),
        high_confidence_matches: count_of(Confidence::High),
        medium_confidence_matches: count_of(Confidence::Medium),
        low_confidence_matches: count_of(Confidence::Low),
        exam_code_breakdown,
        matches: matches.iter().take(REPORT_PREVIEW_LIMIT).cloned().collect(),
        report: None,
    }
}
