//! Exam code commands.

use super::AppContext;
use anyhow::Result;
use colored::Colorize;
use examdup_core::Exam;
use examdup_db::Database;

pub fn create(ctx: &AppContext, code: &str) -> Result<()> {
    let db = ctx.database()?;
    let exam = create_with_db(&db, code)?;

    println!(
        "{} Created exam code {}",
        "✓".green(),
        exam.exam_code.cyan().bold()
    );
    println!("  ID: {}", exam.id);

    Ok(())
}

/// Register an exam code with an existing database connection.
pub fn create_with_db(db: &Database, code: &str) -> Result<Exam> {
    let exam = Exam::new(code)?;
    db.create_exam(&exam)?;
    Ok(exam)
}

pub fn list(ctx: &AppContext) -> Result<()> {
    let db = ctx.database()?;
    let exams = db.list_exams()?;

    if exams.is_empty() {
        println!("{}", "No exam codes registered.".yellow());
        println!("Create one with: {}", "examdup exam create <code>".cyan());
        return Ok(());
    }

    println!("{} ({})", "Exam Codes".cyan().bold(), exams.len());
    println!("{}", "─".repeat(50));

    for exam in &exams {
        let count = db.count_questions(&exam.exam_code)?;
        println!(
            "  {:<24} {:>5} questions  {}",
            exam.exam_code.white().bold(),
            count,
            ctx.format_date(&exam.created_at).dimmed()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_trims_and_rejects_duplicates() {
        let db = Database::open_in_memory().unwrap();

        let exam = create_with_db(&db, "  MATH-101 ").unwrap();
        assert_eq!(exam.exam_code, "MATH-101");

        let err = create_with_db(&db, "MATH-101").unwrap_err();
        assert!(err.to_string().contains("already exists"));

        let err = create_with_db(&db, "   ").unwrap_err();
        assert!(err.to_string().contains("examCode is required"));
    }
}
