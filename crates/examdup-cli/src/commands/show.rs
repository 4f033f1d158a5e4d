//! Show command - display question details.

use super::AppContext;
use anyhow::Result;
use colored::Colorize;
use examdup_db::Database;
use examdup_process::ocr_quality;

pub fn run(ctx: &AppContext, id: &str) -> Result<()> {
    let db = ctx.database()?;
    run_with_db(ctx, &db, id)
}

/// Run show with an existing database connection.
pub fn run_with_db(ctx: &AppContext, db: &Database, id: &str) -> Result<()> {
    let question = db.get_question_by_prefix(id)?;

    println!("{} {}", "Question".white().bold(), question.id);
    println!("{}", "─".repeat(70));

    println!("  {}: {}", "Exam".cyan(), question.exam_code);
    println!(
        "  {}: {}",
        "Uploaded".cyan(),
        ctx.format_date(&question.created_at)
    );
    println!("  {}: {}", "Image".cyan(), question.image_url);

    if let Some(ref hash) = question.image_hash {
        println!("  {}: {}", "Fingerprint".cyan(), hash);
    }

    if let Some(confidence) = question.ocr_confidence {
        println!("  {}: {:.1}%", "OCR confidence".cyan(), confidence);
    }
    println!(
        "  {}: {}",
        "OCR quality".cyan(),
        ocr_quality(&question.extracted_text)
    );

    println!();
    println!(
        "{} ({} characters)",
        "Extracted Text".white().bold(),
        question.extracted_text.chars().count()
    );
    println!("{}", "─".repeat(70));
    println!("{}", question.extracted_text);

    if !question.normalized_text.is_empty() {
        println!();
        println!("{}", "Normalized".white().bold());
        println!("{}", "─".repeat(70));
        println!("{}", question.normalized_text.dimmed());
    }

    Ok(())
}
