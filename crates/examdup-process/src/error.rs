//! Error types for image processing.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for processing operations.
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Errors that can occur while reading and recognizing question scans.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Tool not found: {tool}. Please install it.")]
    ToolNotFound { tool: String },

    #[error("OCR error: {0}")]
    OcrError(String),

    #[error("Failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("File too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Process failed with exit code {code}: {stderr}")]
    ProcessFailed { code: i32, stderr: String },
}

impl From<ProcessError> for examdup_core::Error {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::Io(e) => examdup_core::Error::Io(e),
            ProcessError::FileNotFound(path) => {
                examdup_core::Error::NotFound(path.display().to_string())
            }
            ProcessError::UnsupportedFormat(msg) => examdup_core::Error::InvalidInput(msg),
            other => examdup_core::Error::Ocr(other.to_string()),
        }
    }
}
