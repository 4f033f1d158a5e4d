//! Questions command - list stored questions for an exam code.

use super::AppContext;
use anyhow::Result;
use colored::Colorize;

pub fn run(ctx: &AppContext, exam_code: &str) -> Result<()> {
    let db = ctx.database()?;
    let questions = db.list_questions(exam_code)?;

    println!(
        "{} {} ({} questions)",
        "Exam".cyan().bold(),
        exam_code.white().bold(),
        questions.len()
    );
    println!("{}", "─".repeat(70));

    if questions.is_empty() {
        println!("{}", "No questions stored for this exam code.".yellow());
        return Ok(());
    }

    for question in &questions {
        println!(
            "{} {}  {}",
            question.id[..8].to_string().cyan(),
            ctx.format_date(&question.created_at).dimmed(),
            question.image_url.dimmed()
        );
        println!(
            "  {} characters",
            question.extracted_text.chars().count()
        );
        for line in question.extracted_text.lines() {
            println!("  {}", line);
        }
        println!();
    }

    Ok(())
}
