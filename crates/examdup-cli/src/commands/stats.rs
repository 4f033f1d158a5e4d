//! Stats command - show exam and question counts.

use super::{format_size, AppContext};
use anyhow::Result;
use colored::Colorize;
use examdup_db::Database;

pub fn run(ctx: &AppContext) -> Result<()> {
    let db = ctx.database()?;
    let stats = db.get_stats()?;

    println!("{}", "examdup Statistics".cyan().bold());
    println!("{}", "─".repeat(50));

    println!();
    println!("{}", "Corpus".white().bold());
    println!("  Exams: {}", stats.total_exams.to_string().green());
    println!("  Questions: {}", stats.total_questions.to_string().green());

    if !stats.exams.is_empty() {
        println!();
        println!("{}", "Per Exam".white().bold());
        for exam in &stats.exams {
            println!("  {:<24} {:>5}", exam.exam_code, exam.question_count);
        }
    }

    println!();
    println!("{}", "Storage".white().bold());
    if let Ok(size) = Database::file_size(&ctx.paths.database_file) {
        println!("  Database size: {}", format_size(size));
    }
    println!("  Uploads: {}", ctx.paths.upload_dir.display());

    Ok(())
}
