//! Core domain types for examdup.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for exams.
pub type ExamId = String;

/// Unique identifier for stored questions.
pub type QuestionId = String;

/// Generate a new unique ID.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Threshold used when neither the caller nor the config file supplies one.
pub const DEFAULT_THRESHOLD: f64 = 0.55;

/// Check that a similarity threshold lies in `[0, 1]`.
pub fn validate_threshold(threshold: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(Error::InvalidInput(format!(
            "Text threshold must be between 0 and 1 (got {})",
            threshold
        )));
    }
    Ok(threshold)
}

/// Image formats accepted for question scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpeg",
            ImageKind::Png => "png",
            ImageKind::Gif => "gif",
            ImageKind::Webp => "webp",
        }
    }

    /// Detect image kind from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            "png" => Some(ImageKind::Png),
            "gif" => Some(ImageKind::Gif),
            "webp" => Some(ImageKind::Webp),
            _ => None,
        }
    }

    /// Detect image kind from a path's extension.
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl std::fmt::Display for ImageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered exam code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exam {
    pub id: ExamId,
    pub exam_code: String,
    pub created_at: DateTime<Utc>,
}

impl Exam {
    /// Create a new exam. The code is trimmed and must not be empty.
    pub fn new(exam_code: impl AsRef<str>) -> Result<Self> {
        let exam_code = exam_code.as_ref().trim();
        if exam_code.is_empty() {
            return Err(Error::InvalidInput("examCode is required".to_string()));
        }

        Ok(Self {
            id: new_id(),
            exam_code: exam_code.to_string(),
            created_at: Utc::now(),
        })
    }
}

/// A stored question scan together with its OCR output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub exam_code: String,
    pub image_url: String,
    pub image_hash: Option<String>,
    pub extracted_text: String,
    pub normalized_text: String,
    pub ocr_confidence: Option<f32>,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn new(
        exam_code: impl Into<String>,
        image_url: impl Into<String>,
        extracted_text: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            exam_code: exam_code.into(),
            image_url: image_url.into(),
            image_hash: None,
            extracted_text: extracted_text.into(),
            normalized_text: String::new(),
            ocr_confidence: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_normalized_text(mut self, normalized: impl Into<String>) -> Self {
        self.normalized_text = normalized.into();
        self
    }

    pub fn with_image_hash(mut self, hash: impl Into<String>) -> Self {
        self.image_hash = Some(hash.into());
        self
    }

    pub fn with_ocr_confidence(mut self, confidence: Option<f32>) -> Self {
        self.ocr_confidence = confidence;
        self
    }

    /// Snapshot this question as a corpus entry for matching.
    pub fn to_corpus_entry(&self) -> CorpusEntry {
        CorpusEntry {
            id: self.id.clone(),
            exam_code: self.exam_code.clone(),
            raw_text: self.extracted_text.clone(),
            image_url: self.image_url.clone(),
            created_at: self.created_at,
        }
    }
}

/// A stored question as seen by the matching engine.
///
/// Only the raw extracted text is carried; the engine normalizes it itself
/// so cached normalizations never go stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub id: QuestionId,
    pub exam_code: String,
    pub raw_text: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl CorpusEntry {
    pub fn new(
        id: impl Into<String>,
        exam_code: impl Into<String>,
        raw_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            exam_code: exam_code.into(),
            raw_text: raw_text.into(),
            image_url: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    /// Reject records the engine cannot attribute to a question.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidInput("corpus entry without id".to_string()));
        }
        if self.exam_code.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "corpus entry {} has no exam code",
                self.id
            )));
        }
        Ok(())
    }
}

/// Question count for one exam code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSummary {
    pub exam_code: String,
    pub question_count: i64,
}

/// Statistics about stored exams and questions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_exams: i64,
    pub total_questions: i64,
    pub exams: Vec<ExamSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_kind_from_extension() {
        assert_eq!(ImageKind::from_extension("JPG"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_extension("jpeg"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_extension("webp"), Some(ImageKind::Webp));
        assert_eq!(ImageKind::from_extension("pdf"), None);
        assert_eq!(
            ImageKind::from_path(std::path::Path::new("/scans/q1.png")),
            Some(ImageKind::Png)
        );
    }

    #[test]
    fn test_exam_code_is_trimmed() {
        let exam = Exam::new("  MATH-101 ").unwrap();
        assert_eq!(exam.exam_code, "MATH-101");
        assert!(!exam.id.is_empty());

        assert!(Exam::new("   ").is_err());
    }

    #[test]
    fn test_question_to_corpus_entry() {
        let question = Question::new("MATH-101", "uploads/q1.png", "What is 2 + 2?")
            .with_normalized_text("what is 2 2")
            .with_image_hash("abc123");

        let entry = question.to_corpus_entry();
        assert_eq!(entry.id, question.id);
        assert_eq!(entry.exam_code, "MATH-101");
        assert_eq!(entry.raw_text, "What is 2 + 2?");
        assert_eq!(entry.image_url, "uploads/q1.png");
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn test_corpus_entry_validation() {
        assert!(CorpusEntry::new("", "MATH", "text").validate().is_err());
        assert!(CorpusEntry::new("q1", " ", "text").validate().is_err());
        assert!(CorpusEntry::new("q1", "MATH", "").validate().is_ok());
    }

    #[test]
    fn test_validate_threshold() {
        assert_eq!(validate_threshold(DEFAULT_THRESHOLD).unwrap(), DEFAULT_THRESHOLD);
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(1.0).is_ok());
        assert!(validate_threshold(1.01).is_err());
        assert!(validate_threshold(-0.1).is_err());
        assert!(validate_threshold(f64::NAN).is_err());
    }
}
