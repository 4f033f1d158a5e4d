//! Upload checks applied before a scan is processed.

use crate::error::{ProcessError, ProcessResult};
use examdup_core::ImageKind;
use std::path::Path;

/// Check that a file is an accepted image type and within the size limit.
pub fn validate_image_file(path: &Path, max_bytes: u64) -> ProcessResult<ImageKind> {
    if !path.is_file() {
        return Err(ProcessError::FileNotFound(path.to_path_buf()));
    }

    let kind = ImageKind::from_path(path).ok_or_else(|| {
        ProcessError::UnsupportedFormat(format!(
            "{}: only JPEG, PNG, GIF and WebP images are allowed",
            path.display()
        ))
    })?;

    let size = std::fs::metadata(path)?.len();
    if size > max_bytes {
        return Err(ProcessError::FileTooLarge {
            size,
            limit: max_bytes,
        });
    }

    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_image_file() {
        let dir = tempfile::tempdir().unwrap();

        let png = dir.path().join("scan.PNG");
        std::fs::write(&png, vec![0u8; 100]).unwrap();
        assert_eq!(validate_image_file(&png, 1024).unwrap(), ImageKind::Png);

        assert!(matches!(
            validate_image_file(&png, 10),
            Err(ProcessError::FileTooLarge { size: 100, limit: 10 })
        ));

        let pdf = dir.path().join("scan.pdf");
        std::fs::write(&pdf, b"%PDF").unwrap();
        assert!(matches!(
            validate_image_file(&pdf, 1024),
            Err(ProcessError::UnsupportedFormat(_))
        ));

        assert!(matches!(
            validate_image_file(&dir.path().join("missing.jpg"), 1024),
            Err(ProcessError::FileNotFound(_))
        ));
    }
}
