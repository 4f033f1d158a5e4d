//! Application paths management.

use crate::config::Config;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Manages all application paths following platform conventions.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub config_file: PathBuf,
    pub database_file: PathBuf,
    pub upload_dir: PathBuf,
}

impl AppPaths {
    /// Create paths using platform-specific directories.
    pub fn new() -> Option<Self> {
        let proj_dirs = ProjectDirs::from("com", "examdup", "examdup")?;

        let config_dir = proj_dirs.config_dir().to_path_buf();
        let data_dir = proj_dirs.data_dir().to_path_buf();

        Some(Self::from_dirs(config_dir, data_dir))
    }

    /// Keep config and data together under a single root directory.
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self::from_dirs(root.to_path_buf(), root.join("data"))
    }

    fn from_dirs(config_dir: PathBuf, data_dir: PathBuf) -> Self {
        Self {
            config_file: config_dir.join("config.toml"),
            database_file: data_dir.join("examdup.db"),
            upload_dir: data_dir.join("uploads"),
            config_dir,
            data_dir,
        }
    }

    /// Apply directory overrides from the loaded configuration.
    pub fn with_config(mut self, config: &Config) -> Self {
        if let Some(ref data_dir) = config.general.data_dir {
            self.data_dir = PathBuf::from(data_dir);
            self.database_file = self.data_dir.join("examdup.db");
            self.upload_dir = self.data_dir.join("uploads");
        }
        if let Some(ref upload_dir) = config.storage.upload_dir {
            self.upload_dir = PathBuf::from(upload_dir);
        }
        self
    }

    /// Create all necessary directories.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.upload_dir)?;
        Ok(())
    }

    /// Check if examdup has been initialized.
    pub fn is_initialized(&self) -> bool {
        self.config_file.exists() && self.database_file.exists()
    }
}
