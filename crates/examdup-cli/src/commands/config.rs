//! Configuration commands.

use super::AppContext;
use anyhow::{Context, Result};
use colored::Colorize;
use examdup_config::Config;

pub fn show(ctx: &AppContext) -> Result<()> {
    let paths = &ctx.paths;

    if !paths.config_file.exists() {
        anyhow::bail!("Config file not found. Run 'examdup init' first.");
    }

    let contents =
        std::fs::read_to_string(&paths.config_file).context("Failed to read config file")?;

    println!("{}", "Current Configuration".cyan().bold());
    println!("{}", "─".repeat(50));
    println!("  Config file: {}", paths.config_file.display());
    println!("  Database:    {}", paths.database_file.display());
    println!("  Uploads:     {}", paths.upload_dir.display());
    println!("{}", "─".repeat(50));
    println!("{}", contents);

    Ok(())
}

pub fn set(ctx: &AppContext, key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_from(&ctx.paths.config_file).context("Failed to load config")?;

    apply(&mut config, key, value)?;

    config
        .save_to(&ctx.paths.config_file)
        .context("Failed to save config")?;

    println!("{} Set {} = {}", "✓".green(), key.cyan(), value);

    Ok(())
}

/// Apply one dotted `section.key` assignment.
fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "data_dir"] => config.general.data_dir = Some(value.to_string()),
        ["matching", "default_threshold"] => {
            config.matching.default_threshold =
                value.parse().context("Invalid threshold value")?;
        }
        ["ocr", "language"] => config.ocr.language = value.to_string(),
        ["ocr", "oem"] => {
            config.ocr.oem = value.parse().context("Invalid oem value")?;
        }
        ["ocr", "psm"] => {
            config.ocr.psm = value.parse().context("Invalid psm value")?;
        }
        ["ocr", "min_text_chars"] => {
            config.ocr.min_text_chars = value.parse().context("Invalid min_text_chars value")?;
        }
        ["ocr", "timeout_seconds"] => {
            config.ocr.timeout_seconds = value.parse().context("Invalid timeout value")?;
        }
        ["storage", "upload_dir"] => config.storage.upload_dir = Some(value.to_string()),
        ["storage", "max_upload_bytes"] => {
            config.storage.max_upload_bytes =
                value.parse().context("Invalid max_upload_bytes value")?;
        }
        ["ui", "color"] => {
            config.ui.color = value.parse().context("Invalid boolean value")?;
        }
        ["ui", "date_format"] => config.ui.date_format = value.to_string(),
        _ => {
            anyhow::bail!("Unknown config key: {}", key);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_known_keys() {
        let mut config = Config::default();
        apply(&mut config, "matching.default_threshold", "0.7").unwrap();
        apply(&mut config, "ocr.psm", "6").unwrap();
        apply(&mut config, "ui.color", "false").unwrap();

        assert_eq!(config.matching.default_threshold, 0.7);
        assert_eq!(config.ocr.psm, 6);
        assert!(!config.ui.color);
    }

    #[test]
    fn test_apply_rejects_bad_input() {
        let mut config = Config::default();
        assert!(apply(&mut config, "ocr.timeout_seconds", "soon").is_err());
        assert!(apply(&mut config, "matching.weights", "x").is_err());
    }

    #[test]
    fn test_set_validates_before_saving() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::load(Some(dir.path())).unwrap();

        set(&ctx, "matching.default_threshold", "0.8").unwrap();
        let saved = Config::load_from(&ctx.paths.config_file).unwrap();
        assert_eq!(saved.matching.default_threshold, 0.8);

        assert!(set(&ctx, "matching.default_threshold", "1.5").is_err());
        let saved = Config::load_from(&ctx.paths.config_file).unwrap();
        assert_eq!(saved.matching.default_threshold, 0.8);
    }
}
