//! Initialize examdup.

use super::AppContext;
use anyhow::{Context, Result};
use colored::Colorize;
use examdup_config::Config;
use examdup_db::Database;

pub fn run(ctx: &AppContext) -> Result<()> {
    let paths = &ctx.paths;

    // Check if already initialized
    if paths.is_initialized() {
        println!("{} examdup is already initialized.", "Note:".yellow().bold());
        println!("  Config: {}", paths.config_file.display());
        println!("  Database: {}", paths.database_file.display());
        return Ok(());
    }

    println!("{}", "Initializing examdup...".cyan().bold());

    paths.ensure_dirs().context("Failed to create directories")?;
    println!("  {} Created directories", "✓".green());

    if !paths.config_file.exists() {
        Config::create_default_file(&paths.config_file)
            .context("Failed to create config file")?;
    }
    println!(
        "  {} Config: {}",
        "✓".green(),
        paths.config_file.display()
    );

    let _db = Database::open(&paths.database_file).context("Failed to initialize database")?;
    println!(
        "  {} Created database: {}",
        "✓".green(),
        paths.database_file.display()
    );
    println!(
        "  {} Uploads: {}",
        "✓".green(),
        paths.upload_dir.display()
    );

    for (tool, available) in examdup_process::check_dependencies() {
        if !available {
            println!(
                "  {} {} not found on PATH; upload and compare need it",
                "!".yellow(),
                tool
            );
        }
    }

    println!();
    println!("{}", "examdup initialized successfully!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Register an exam: {}", "examdup exam create MATH-101".cyan());
    println!(
        "  2. Upload questions: {}",
        "examdup upload MATH-101 ./scans".cyan()
    );
    println!(
        "  3. Check a new scan: {}",
        "examdup compare ./new-question.jpg".cyan()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::load(Some(dir.path())).unwrap();

        run(&ctx).unwrap();
        assert!(ctx.paths.config_file.exists());
        assert!(ctx.paths.database_file.exists());
        assert!(ctx.paths.upload_dir.is_dir());

        // Running again is harmless.
        run(&ctx).unwrap();
        assert!(ctx.database().is_ok());
    }
}
