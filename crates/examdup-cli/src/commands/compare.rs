//! Compare command - check a scan against stored questions.

use super::{print_suggestions, truncate, AppContext};
use anyhow::{Context, Result};
use colored::Colorize;
use examdup_core::{validate_threshold, CorpusEntry, QuestionCorpus};
use examdup_db::Database;
use examdup_match::{
    generate_report, match_corpus, normalize, score_breakdown, Confidence, MatchCandidate,
    MatchOutcome, MatchReport, NearMiss, ScoreBreakdown, MATCH_PREVIEW_CHARS,
};
use examdup_process::{hash_image, image_similarity, ocr_image, validate_image_file, OcrOptions};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::debug;

const NO_TEXT_SUGGESTIONS: &[&str] = &[
    "Ensure image has readable text",
    "Try higher quality image",
    "Ensure text is horizontal and not rotated",
];

/// Flags for `examdup compare`.
pub struct CompareOptions {
    pub threshold: Option<f64>,
    pub exam: Option<String>,
    pub json: bool,
    pub explain: bool,
}

/// Everything produced by one OCR + matching pass.
pub struct Comparison {
    pub uploaded_text: String,
    pub threshold: f64,
    pub outcome: MatchOutcome,
    pub corpus: Vec<CorpusEntry>,
    pub image_similarity: Option<f64>,
}

/// Per-metric scores for one stored question.
#[derive(Debug, Serialize)]
pub struct Explanation {
    pub question_id: String,
    pub exam_code: String,
    #[serde(flatten)]
    pub scores: ScoreBreakdown,
}

/// JSON document emitted by `compare --json`.
#[derive(Debug, Serialize)]
pub struct ComparePayload<'a> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'a str>,
    pub uploaded_text_preview: String,
    pub uploaded_text_length: usize,
    pub top_match: Option<&'a MatchCandidate>,
    pub threshold_used: f64,
    pub suggested_threshold: Option<f64>,
    pub report: MatchReport,
    pub results: &'a [MatchCandidate],
    pub debug_info: &'a [NearMiss],
    pub image_similarity: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explanations: Vec<Explanation>,
}

pub fn run(ctx: &AppContext, image: &Path, options: CompareOptions) -> Result<()> {
    let threshold = validate_threshold(
        options
            .threshold
            .unwrap_or(ctx.config.matching.default_threshold),
    )?;
    validate_image_file(image, ctx.config.storage.max_upload_bytes)?;

    let db = ctx.database()?;
    if let Some(ref code) = options.exam {
        db.get_exam(code)?;
    }

    let timeout = Duration::from_secs(ctx.config.ocr.timeout_seconds);
    let job = CompareJob {
        db,
        image: image.to_path_buf(),
        ocr: ctx.ocr_options(),
        exam: options.exam.clone(),
        threshold,
    };

    let rt = Runtime::new().context("Failed to create async runtime")?;
    let result = rt.block_on(async move {
        tokio::time::timeout(timeout, tokio::task::spawn_blocking(move || job.run())).await
    });

    let comparison = match result {
        Ok(joined) => joined.context("Comparison task failed")??,
        Err(_) => {
            // Tesseract may still be running; do not wait for it.
            rt.shutdown_background();
            anyhow::bail!(
                "Comparison timed out after {} seconds",
                timeout.as_secs()
            );
        }
    };

    let Some(comparison) = comparison else {
        print_suggestions(NO_TEXT_SUGGESTIONS);
        anyhow::bail!("Could not extract text from uploaded image");
    };

    let explanations = if options.explain {
        explain(&comparison)
    } else {
        Vec::new()
    };
    let payload = build_payload(&comparison, explanations);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_human(ctx, &payload);
    }

    Ok(())
}

/// Owned inputs for the blocking OCR + matching pass.
struct CompareJob {
    db: Database,
    image: PathBuf,
    ocr: OcrOptions,
    exam: Option<String>,
    threshold: f64,
}

impl CompareJob {
    /// Returns `None` when OCR found no text at all.
    fn run(self) -> Result<Option<Comparison>> {
        let ocr = ocr_image(&self.image, &self.ocr)
            .with_context(|| format!("OCR failed for {}", self.image.display()))?;
        if ocr.text.trim().is_empty() {
            return Ok(None);
        }
        debug!(
            "OCR extracted {} characters from uploaded image",
            ocr.text.chars().count()
        );

        let corpus = match self.exam {
            Some(ref code) => self.db.entries_for_exam(code)?,
            None => self.db.all_entries()?,
        };
        for entry in &corpus {
            entry.validate()?;
        }

        let outcome = match_corpus(&ocr.text, &corpus, self.threshold);

        let image_similarity = match outcome.top_match() {
            Some(top) => self.top_match_image_similarity(top),
            None => None,
        };

        Ok(Some(Comparison {
            uploaded_text: ocr.text,
            threshold: self.threshold,
            outcome,
            corpus,
            image_similarity,
        }))
    }

    fn top_match_image_similarity(&self, top: &MatchCandidate) -> Option<f64> {
        let stored = self.db.get_question(&top.question_id).ok()?.image_hash?;
        match hash_image(&self.image) {
            Ok(uploaded) => Some(image_similarity(&uploaded, &stored)),
            Err(e) => {
                debug!("Could not fingerprint uploaded image: {}", e);
                None
            }
        }
    }
}

/// Score breakdowns for the confirmed matches, or the near misses when
/// nothing cleared the threshold.
pub fn explain(comparison: &Comparison) -> Vec<Explanation> {
    let query = normalize(&comparison.uploaded_text);
    let ids: Vec<&str> = match comparison.outcome.results() {
        [] => comparison
            .outcome
            .debug_info()
            .iter()
            .map(|n| n.question_id.as_str())
            .collect(),
        results => results.iter().map(|m| m.question_id.as_str()).collect(),
    };

    ids.into_iter()
        .filter_map(|id| comparison.corpus.iter().find(|e| e.id == id))
        .map(|entry| Explanation {
            question_id: entry.id.clone(),
            exam_code: entry.exam_code.clone(),
            scores: score_breakdown(&query, &normalize(&entry.raw_text)),
        })
        .collect()
}

pub fn build_payload(comparison: &Comparison, explanations: Vec<Explanation>) -> ComparePayload<'_> {
    let outcome = &comparison.outcome;

    ComparePayload {
        status: outcome.status(),
        reason: outcome.reason(),
        uploaded_text_preview: comparison
            .uploaded_text
            .chars()
            .take(MATCH_PREVIEW_CHARS)
            .collect(),
        uploaded_text_length: comparison.uploaded_text.chars().count(),
        top_match: outcome.top_match(),
        threshold_used: comparison.threshold,
        suggested_threshold: outcome.suggested_threshold(),
        report: generate_report(outcome.results()),
        results: outcome.results(),
        debug_info: outcome.debug_info(),
        image_similarity: comparison.image_similarity,
        explanations,
    }
}

fn print_human(ctx: &AppContext, payload: &ComparePayload<'_>) {
    let status = match payload.status {
        "SUCCESS" => payload.status.green().bold(),
        "NO_CONFIRMED_MATCH" => payload.status.yellow().bold(),
        _ => payload.status.red().bold(),
    };
    println!("{} {}", "Status:".white().bold(), status);
    if let Some(reason) = payload.reason {
        println!("  {}", reason);
    }
    println!(
        "  Uploaded text: {} characters, threshold {:.2}",
        payload.uploaded_text_length, payload.threshold_used
    );
    println!("  {}", truncate(&payload.uploaded_text_preview, 120).dimmed());

    if !payload.results.is_empty() {
        let report = &payload.report;
        println!();
        println!(
            "{} ({} total: {} high, {} medium, {} low)",
            "Matches".white().bold(),
            report.total_matches,
            report.high_confidence_matches,
            report.medium_confidence_matches,
            report.low_confidence_matches
        );
        println!("{}", "─".repeat(70));

        for candidate in payload.results {
            let confidence = match candidate.confidence {
                Confidence::High => candidate.confidence.as_str().green(),
                Confidence::Medium => candidate.confidence.as_str().yellow(),
                Confidence::Low => candidate.confidence.as_str().red(),
            };
            println!(
                "{:.2} {:<6} {} {}  {}",
                candidate.score,
                confidence,
                candidate.question_id[..8].to_string().cyan(),
                candidate.exam_code.white().bold(),
                ctx.format_date(&candidate.uploaded_at).dimmed()
            );
            println!("     {}", truncate(&candidate.matched_text_preview, 100));
        }

        if report.exam_code_breakdown.len() > 1 {
            println!();
            println!("{}", "By exam".white().bold());
            for entry in &report.exam_code_breakdown {
                println!("  {:<24} {:>3}", entry.exam_code, entry.count);
            }
        }
    }

    if !payload.debug_info.is_empty() {
        println!();
        println!("{}", "Closest questions".white().bold());
        println!("{}", "─".repeat(70));
        for miss in payload.debug_info {
            println!(
                "{:.2} {} {}",
                miss.score,
                miss.question_id[..8].to_string().cyan(),
                miss.exam_code
            );
            println!("     {}", miss.text_preview.dimmed());
        }
    }

    if let Some(suggested) = payload.suggested_threshold {
        println!();
        println!(
            "{} try {} to include the closest question",
            "Hint:".yellow().bold(),
            format!("--threshold {:.2}", suggested).cyan()
        );
    }

    if let Some(similarity) = payload.image_similarity {
        println!();
        println!("  Image fingerprint similarity to top match: {:.2}", similarity);
    }

    if !payload.explanations.is_empty() {
        println!();
        println!("{}", "Score breakdown".white().bold());
        println!("{}", "─".repeat(70));
        for explanation in &payload.explanations {
            let s = &explanation.scores;
            println!(
                "{} cosine {:.2}  jaccard {:.2}  levenshtein {:.2}  fuzzy {:.2}  => {:.2}",
                explanation.question_id[..8].to_string().cyan(),
                s.cosine,
                s.jaccard,
                s.levenshtein,
                s.fuzzy_tokens,
                s.combined
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comparison(query: &str, corpus: Vec<CorpusEntry>, threshold: f64) -> Comparison {
        let outcome = match_corpus(query, &corpus, threshold);
        Comparison {
            uploaded_text: query.to_string(),
            threshold,
            outcome,
            corpus,
            image_similarity: None,
        }
    }

    #[test]
    fn test_payload_for_success() {
        let corpus = vec![
            CorpusEntry::new("q-1", "MATH-101", "The quick brown fox"),
            CorpusEntry::new("q-2", "BIO-200", "Describe the cell membrane"),
        ];
        let comparison = comparison("the quick brown fox", corpus, 0.55);
        let payload = build_payload(&comparison, Vec::new());

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["status"], "SUCCESS");
        assert_eq!(json["top_match"]["question_id"], "q-1");
        assert_eq!(json["threshold_used"], 0.55);
        assert_eq!(json["uploaded_text_length"], 19);
        assert_eq!(json["report"]["total_matches"], 1);
        assert!(json["suggested_threshold"].is_null());
        assert!(json["image_similarity"].is_null());
        assert!(json.get("explanations").is_none());
    }

    #[test]
    fn test_payload_for_near_miss() {
        let corpus = vec![CorpusEntry::new("q-1", "MATH-101", "alpha beta gamma delta")];
        let comparison = comparison("alpha beta", corpus, 0.95);
        let payload = build_payload(&comparison, Vec::new());

        assert_eq!(payload.status, "NO_CONFIRMED_MATCH");
        assert!(payload.results.is_empty());
        assert_eq!(payload.debug_info.len(), 1);
        assert!(payload.suggested_threshold.is_some());
        assert_eq!(payload.report.report.as_deref(), Some("No matches found"));
    }

    #[test]
    fn test_explain_covers_near_misses() {
        let corpus = vec![CorpusEntry::new("q-1", "MATH-101", "alpha beta gamma delta")];
        let comparison = comparison("alpha beta", corpus, 0.95);

        let explanations = explain(&comparison);
        assert_eq!(explanations.len(), 1);
        assert_eq!(explanations[0].question_id, "q-1");
        assert_eq!(
            explanations[0].scores.combined,
            comparison.outcome.debug_info()[0].score
        );
    }

    #[test]
    fn test_preview_is_limited() {
        let long = "word ".repeat(200);
        let corpus = vec![CorpusEntry::new("q-1", "X", "other text")];
        let comparison = comparison(&long, corpus, 0.55);
        let payload = build_payload(&comparison, Vec::new());

        assert_eq!(payload.uploaded_text_preview.chars().count(), MATCH_PREVIEW_CHARS);
        assert_eq!(payload.uploaded_text_length, 1000);
    }
}
