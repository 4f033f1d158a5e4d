//! Upload command - OCR question scans and store them.

use super::{print_suggestions, truncate, AppContext};
use anyhow::{Context, Result};
use colored::Colorize;
use examdup_core::{ImageKind, Question};
use examdup_db::Database;
use examdup_match::normalize;
use examdup_process::{hash_image, ocr_image, validate_image_file, OcrResult};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{debug, warn};

/// Uploads with more extracted text than this are reported as GOOD.
const GOOD_TEXT_CHARS: usize = 50;

const LOW_TEXT_SUGGESTIONS: &[&str] = &[
    "Use higher quality image (JPG preferred over PNG)",
    "Ensure image has black text on white/light background",
    "Make sure text is horizontal (not rotated)",
    "Increase image contrast if text is faint",
    "Crop image to show only the text area",
    "Minimum recommended image width: 300 pixels",
];

/// What happened to one scan.
pub enum ScanOutcome {
    Stored(Question),
    TooLittleText { chars: usize },
}

pub fn run(ctx: &AppContext, exam_code: &str, path: &Path) -> Result<()> {
    let db = ctx.database()?;

    // Fail before any OCR work if the exam is unknown.
    db.get_exam(exam_code)?;

    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    if path.is_file() {
        upload_single(ctx, &db, exam_code, path)
    } else {
        upload_directory(ctx, &db, exam_code, path)
    }
}

fn upload_single(ctx: &AppContext, db: &Database, exam_code: &str, path: &Path) -> Result<()> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Reading {}", path.display()));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let outcome = store_scan(ctx, db, exam_code, path);
    pb.finish_and_clear();

    match outcome? {
        ScanOutcome::Stored(question) => {
            let chars = question.extracted_text.chars().count();
            let quality = if chars > GOOD_TEXT_CHARS { "GOOD" } else { "FAIR" };

            println!(
                "{} Question uploaded to {}",
                "✓".green(),
                question.exam_code.cyan().bold()
            );
            println!("  ID: {}", question.id);
            println!("  Image: {}", question.image_url);
            println!("  Extracted: {} characters (OCR quality: {})", chars, quality);
            println!("  {}", truncate(&question.extracted_text, 200).dimmed());
            Ok(())
        }
        ScanOutcome::TooLittleText { chars } => {
            print_suggestions(LOW_TEXT_SUGGESTIONS);
            anyhow::bail!(
                "Could not extract sufficient text from image ({} characters)",
                chars
            )
        }
    }
}

fn upload_directory(ctx: &AppContext, db: &Database, exam_code: &str, dir: &Path) -> Result<()> {
    println!("{} {}", "Scanning:".cyan(), dir.display());

    let files: Vec<_> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| {
            // Skip hidden files
            !e.path()
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with('.'))
                .unwrap_or(false)
        })
        .filter(|e| ImageKind::from_path(e.path()).is_some())
        .collect();

    if files.is_empty() {
        println!("{}", "No supported images found.".yellow());
        return Ok(());
    }

    println!("Found {} images", files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut stored = 0;
    let mut rejected = Vec::new();
    let mut failed = Vec::new();

    for entry in &files {
        let filename = entry
            .path()
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file");
        pb.set_message(filename.to_string());

        match store_scan(ctx, db, exam_code, entry.path()) {
            Ok(ScanOutcome::Stored(_)) => stored += 1,
            Ok(ScanOutcome::TooLittleText { .. }) => rejected.push(entry.path().to_path_buf()),
            Err(e) => failed.push((entry.path().to_path_buf(), e)),
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    println!("\n{} {} questions", "Uploaded:".green().bold(), stored);
    if !rejected.is_empty() {
        println!(
            "{} {} images (not enough text)",
            "Rejected:".yellow().bold(),
            rejected.len()
        );
        for path in &rejected {
            println!("  {}", path.display());
        }
    }
    if !failed.is_empty() {
        println!("{} {} images", "Failed:".red().bold(), failed.len());
        for (path, e) in &failed {
            println!("  {}: {:#}", path.display(), e);
        }
    }

    Ok(())
}

/// Run one scan through OCR, fingerprinting and storage.
pub fn store_scan(
    ctx: &AppContext,
    db: &Database,
    exam_code: &str,
    path: &Path,
) -> Result<ScanOutcome> {
    validate_image_file(path, ctx.config.storage.max_upload_bytes)?;

    let OcrResult { text, confidence } = ocr_image(path, &ctx.ocr_options())
        .with_context(|| format!("OCR failed for {}", path.display()))?;

    let chars = text.trim().chars().count();
    if chars < ctx.config.ocr.min_text_chars {
        return Ok(ScanOutcome::TooLittleText { chars });
    }

    let image_hash = match hash_image(path) {
        Ok(hash) => Some(hash),
        Err(e) => {
            warn!("Could not fingerprint {}: {}", path.display(), e);
            None
        }
    };

    let question = Question::new(exam_code, "", text.clone())
        .with_normalized_text(normalize(&text))
        .with_ocr_confidence(confidence);
    let question = match image_hash {
        Some(hash) => question.with_image_hash(hash),
        None => question,
    };

    store_question(ctx, db, question, path).map(ScanOutcome::Stored)
}

/// Copy the image into the upload directory and persist the question.
fn store_question(
    ctx: &AppContext,
    db: &Database,
    mut question: Question,
    source: &Path,
) -> Result<Question> {
    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_else(|| "img".to_string());

    std::fs::create_dir_all(&ctx.paths.upload_dir)
        .context("Failed to create upload directory")?;
    let dest = ctx.paths.upload_dir.join(format!("{}.{}", question.id, ext));
    std::fs::copy(source, &dest)
        .with_context(|| format!("Failed to copy image to {}", dest.display()))?;
    question.image_url = dest.display().to_string();

    debug!("Storing question {} for {}", question.id, question.exam_code);

    if let Err(e) = db.create_question(&question) {
        let _ = std::fs::remove_file(&dest);
        return Err(e.into());
    }

    Ok(question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use examdup_core::Exam;

    #[test]
    fn test_store_question_copies_image() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::load(Some(dir.path())).unwrap();
        let db = Database::open_in_memory().unwrap();
        db.create_exam(&Exam::new("MATH-101").unwrap()).unwrap();

        let source = dir.path().join("scan.PNG");
        std::fs::write(&source, b"fake image bytes").unwrap();

        let question = Question::new("MATH-101", "", "What is two plus two?");
        let stored = store_question(&ctx, &db, question, &source).unwrap();

        let dest = Path::new(&stored.image_url);
        assert!(dest.starts_with(&ctx.paths.upload_dir));
        assert_eq!(dest.extension().and_then(|e| e.to_str()), Some("png"));
        assert_eq!(std::fs::read(dest).unwrap(), b"fake image bytes");
        assert_eq!(db.get_question(&stored.id).unwrap().image_url, stored.image_url);
    }

    #[test]
    fn test_store_question_cleans_up_on_unknown_exam() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::load(Some(dir.path())).unwrap();
        let db = Database::open_in_memory().unwrap();

        let source = dir.path().join("scan.jpg");
        std::fs::write(&source, b"bytes").unwrap();

        let question = Question::new("NOPE", "", "text");
        let id = question.id.clone();
        assert!(store_question(&ctx, &db, question, &source).is_err());
        assert!(!ctx.paths.upload_dir.join(format!("{}.jpg", id)).exists());
    }
}
