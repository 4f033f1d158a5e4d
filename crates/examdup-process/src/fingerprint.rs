//! Image fingerprints for spotting re-uploaded scans.
//!
//! The fingerprint is a SHA-256 over an 8x8 grayscale thumbnail. It only
//! identifies pixel-identical thumbnails, so it stays a side signal next to
//! the text score.

use crate::error::{ProcessError, ProcessResult};
use image::imageops::FilterType;
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::debug;

/// Thumbnail edge length used for fingerprints.
pub const FINGERPRINT_SIZE: u32 = 8;

/// Fingerprint an encoded image held in memory.
pub fn hash_image_bytes(bytes: &[u8]) -> ProcessResult<String> {
    let img = image::load_from_memory(bytes)?;
    let thumb = img
        .resize_exact(FINGERPRINT_SIZE, FINGERPRINT_SIZE, FilterType::Triangle)
        .to_luma8();

    let mut hasher = Sha256::new();
    hasher.update(thumb.as_raw());
    let hash = hasher.finalize();

    Ok(hash.iter().map(|b| format!("{:02x}", b)).collect())
}

/// Fingerprint an image file.
pub fn hash_image(path: &Path) -> ProcessResult<String> {
    if !path.exists() {
        return Err(ProcessError::FileNotFound(path.to_path_buf()));
    }
    debug!("Fingerprinting {:?}", path);
    let bytes = std::fs::read(path)?;
    hash_image_bytes(&bytes)
}

/// Number of differing positions. Hashes of different lengths are treated
/// as entirely different.
pub fn hamming_distance(a: &str, b: &str) -> usize {
    if a.len() != b.len() {
        return a.len().max(b.len());
    }
    a.bytes().zip(b.bytes()).filter(|(x, y)| x != y).count()
}

/// Similarity of two fingerprints in [0, 1], rounded to 2 decimals.
pub fn image_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 1.0;
    }
    let similarity = 1.0 - hamming_distance(a, b) as f64 / max_len as f64;
    (similarity * 100.0).round() / 100.0
}
