//! Examdup Process - Turning question scans into comparable data.
//!
//! This crate provides:
//! - OCR for images (via Tesseract CLI)
//! - OCR output cleanup and a quality heuristic
//! - Image fingerprints for spotting re-uploaded scans
//!
//! OCR relies on `tesseract` being installed on the system.

mod error;
mod fingerprint;
mod input;
mod ocr;

pub use error::{ProcessError, ProcessResult};
pub use fingerprint::{hamming_distance, hash_image, hash_image_bytes, image_similarity};
pub use input::validate_image_file;
pub use ocr::{clean_ocr_text, ocr_image, ocr_quality, parse_tsv, OcrOptions, OcrQuality, OcrResult};

/// Check if required external tools are available.
pub fn check_dependencies() -> Vec<(&'static str, bool)> {
    vec![("tesseract", which::which("tesseract").is_ok())]
}
