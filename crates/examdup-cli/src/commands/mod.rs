//! CLI command implementations.

pub mod compare;
pub mod config;
pub mod delete;
pub mod exam;
pub mod init;
pub mod questions;
pub mod show;
pub mod stats;
pub mod upload;

use anyhow::{Context, Result};
use colored::Colorize;
use examdup_config::{AppPaths, Config};
use examdup_db::Database;
use examdup_process::OcrOptions;
use std::path::Path;

/// Resolved paths and configuration shared by every command.
pub struct AppContext {
    pub paths: AppPaths,
    pub config: Config,
}

impl AppContext {
    /// Resolve paths (platform defaults or `home`) and load the config file.
    pub fn load(home: Option<&Path>) -> Result<Self> {
        let base = match home {
            Some(root) => AppPaths::from_root(root),
            None => AppPaths::new().context("Failed to determine application directories")?,
        };

        let config = Config::load_from(&base.config_file).context("Failed to load config")?;
        if !config.ui.color {
            colored::control::set_override(false);
        }

        Ok(Self {
            paths: base.with_config(&config),
            config,
        })
    }

    /// Open the database, ensuring examdup is initialized.
    pub fn database(&self) -> Result<Database> {
        if !self.paths.is_initialized() {
            anyhow::bail!("examdup is not initialized. Run 'examdup init' first.");
        }

        Database::open(&self.paths.database_file).context("Failed to open database")
    }

    /// Tesseract settings from the `[ocr]` section.
    pub fn ocr_options(&self) -> OcrOptions {
        OcrOptions {
            language: self.config.ocr.language.clone(),
            oem: self.config.ocr.oem,
            psm: self.config.ocr.psm,
        }
    }

    /// Format a timestamp with the configured date format.
    pub fn format_date(&self, date: &chrono::DateTime<chrono::Utc>) -> String {
        date.format(&self.config.ui.date_format).to_string()
    }
}

/// First `max_chars` characters of `text`, with an ellipsis when cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", cut)
}

/// Print a list of hints after a failed OCR step.
pub fn print_suggestions(suggestions: &[&str]) {
    eprintln!("{}", "Suggestions:".yellow().bold());
    for suggestion in suggestions {
        eprintln!("  - {}", suggestion);
    }
}

/// Format a file size in human-readable form.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("this is too long", 10), "this is...");
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(10 * 1024 * 1024), "10.00 MB");
    }

    #[test]
    fn test_context_from_home() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::load(Some(dir.path())).unwrap();

        assert_eq!(ctx.paths.config_file, dir.path().join("config.toml"));
        assert_eq!(ctx.paths.upload_dir, dir.path().join("data").join("uploads"));
        assert_eq!(ctx.config.matching.default_threshold, examdup_core::DEFAULT_THRESHOLD);
        assert!(ctx.database().is_err());
    }
}
