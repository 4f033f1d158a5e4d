//! OCR processing using Tesseract.

use crate::error::{ProcessError, ProcessResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// Tesseract invocation settings.
#[derive(Debug, Clone)]
pub struct OcrOptions {
    /// Tesseract language pack, e.g. `eng`.
    pub language: String,
    /// OCR engine mode (`--oem`).
    pub oem: u8,
    /// Page segmentation mode (`--psm`).
    pub psm: u8,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            oem: 3,  // LSTM + legacy engine
            psm: 1,  // Automatic page segmentation with OSD
        }
    }
}

/// Result of OCR processing.
#[derive(Debug, Clone)]
pub struct OcrResult {
    /// The extracted text, cleaned with [`clean_ocr_text`].
    pub text: String,
    /// Mean word confidence (0-100), if any word was recognized.
    pub confidence: Option<f32>,
}

/// Perform OCR on an image file.
pub fn ocr_image(image_path: &Path, options: &OcrOptions) -> ProcessResult<OcrResult> {
    if !image_path.exists() {
        return Err(ProcessError::FileNotFound(image_path.to_path_buf()));
    }

    if which::which("tesseract").is_err() {
        return Err(ProcessError::ToolNotFound {
            tool: "tesseract".to_string(),
        });
    }

    debug!("Running OCR on {:?}", image_path);

    let output = Command::new("tesseract")
        .arg(image_path)
        .arg("stdout")
        .args(["-l", &options.language])
        .args(["--oem", &options.oem.to_string()])
        .args(["--psm", &options.psm.to_string()])
        .arg("tsv")
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        // Tesseract sometimes outputs warnings to stderr but still works
        if !output.stdout.is_empty() {
            debug!("Tesseract warning: {}", stderr);
        } else {
            return Err(match output.status.code() {
                Some(code) => ProcessError::ProcessFailed {
                    code,
                    stderr: stderr.trim().to_string(),
                },
                None => ProcessError::OcrError(stderr.trim().to_string()),
            });
        }
    }

    let tsv = String::from_utf8_lossy(&output.stdout);
    let parsed = parse_tsv(&tsv);
    let text = clean_ocr_text(&parsed.text);

    if text.is_empty() {
        warn!(
            "Tesseract returned empty text for {:?}; the image may not contain readable text",
            image_path
        );
    } else {
        debug!(
            "OCR extracted {} characters (confidence {:?})",
            text.chars().count(),
            parsed.confidence
        );
    }

    Ok(OcrResult {
        text,
        confidence: parsed.confidence,
    })
}

/// Reassemble Tesseract TSV output into text lines.
///
/// Word rows (level 5) with a non-negative confidence are grouped by
/// page, block, paragraph and line in the order Tesseract emits them.
pub fn parse_tsv(tsv: &str) -> OcrResult {
    let mut lines: Vec<((u32, u32, u32, u32), Vec<&str>)> = Vec::new();
    let mut conf_sum = 0.0f32;
    let mut word_count = 0usize;

    for row in tsv.lines().skip(1) {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 {
            continue;
        }
        if cols[0].parse::<u32>().unwrap_or(0) != 5 {
            continue;
        }
        let conf: f32 = cols[10].trim().parse().unwrap_or(-1.0);
        let text = cols[11].trim();
        if text.is_empty() || conf < 0.0 {
            continue;
        }

        let key = (
            cols[1].parse().unwrap_or(0),
            cols[2].parse().unwrap_or(0),
            cols[3].parse().unwrap_or(0),
            cols[4].parse().unwrap_or(0),
        );
        match lines.last_mut() {
            Some((last_key, words)) if *last_key == key => words.push(text),
            _ => lines.push((key, vec![text])),
        }

        conf_sum += conf;
        word_count += 1;
    }

    let text = lines
        .iter()
        .map(|(_, words)| words.join(" "))
        .collect::<Vec<_>>()
        .join("\n");

    OcrResult {
        text,
        confidence: (word_count > 0).then(|| conf_sum / word_count as f32),
    }
}

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{3,}").unwrap());
static NEWLINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static PUNCTUATION_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{3,}|!{3,}|\?{3,}").unwrap());
static SUSPICIOUS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0O]{2,}|[1l|]{2,}|[~`^]{2,}").unwrap());

/// Remove common OCR noise from raw output.
///
/// Long whitespace runs collapse to a space, long newline runs to a blank
/// line, and repeated `.`, `!` or `?` to a single mark.
pub fn clean_ocr_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = WHITESPACE_RUN.replace_all(text, " ");
    let text = NEWLINE_RUN.replace_all(&text, "\n\n");
    let text = PUNCTUATION_RUN.replace_all(&text, |caps: &regex::Captures| {
        caps[0][..1].to_string()
    });
    text.trim().to_string()
}

/// Heuristic quality of recognized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OcrQuality {
    High,
    Medium,
    Low,
    VeryLow,
}

impl OcrQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            OcrQuality::High => "HIGH",
            OcrQuality::Medium => "MEDIUM",
            OcrQuality::Low => "LOW",
            OcrQuality::VeryLow => "VERY_LOW",
        }
    }
}

impl std::fmt::Display for OcrQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rate OCR output by how often typical misreads (`00`, `ll`, `~~`) occur.
pub fn ocr_quality(text: &str) -> OcrQuality {
    if text.is_empty() {
        return OcrQuality::VeryLow;
    }

    let suspicious = SUSPICIOUS.find_iter(text).count() as f64;
    let ratio = suspicious / (text.chars().count() as f64 / 10.0);

    if ratio < 0.1 {
        OcrQuality::High
    } else if ratio < 0.3 {
        OcrQuality::Medium
    } else if ratio < 0.5 {
        OcrQuality::Low
    } else {
        OcrQuality::VeryLow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    fn word(block: u32, line: u32, conf: &str, text: &str) -> String {
        format!("5\t1\t{block}\t1\t{line}\t1\t0\t0\t10\t10\t{conf}\t{text}")
    }

    #[test]
    fn test_parse_tsv_groups_lines() {
        let tsv = [
            HEADER.to_string(),
            "1\t1\t0\t0\t0\t0\t0\t0\t100\t100\t-1\t".to_string(),
            word(1, 1, "90", "What"),
            word(1, 1, "80", "is"),
            word(1, 2, "70", "2+2?"),
            word(1, 2, "-1", "ignored"),
            word(2, 1, "60", "Four"),
        ]
        .join("\n");

        let result = parse_tsv(&tsv);
        assert_eq!(result.text, "What is\n2+2?\nFour");
        assert_eq!(result.confidence, Some(75.0));
    }

    #[test]
    fn test_parse_tsv_without_words() {
        let result = parse_tsv(HEADER);
        assert_eq!(result.text, "");
        assert_eq!(result.confidence, None);
        assert_eq!(parse_tsv("").confidence, None);
    }

    #[test]
    fn test_clean_ocr_text() {
        assert_eq!(clean_ocr_text(""), "");
        assert_eq!(clean_ocr_text("  What   is this  "), "What is this");
        assert_eq!(clean_ocr_text("Wait..... really!!!??"), "Wait. really!??");
        assert_eq!(clean_ocr_text("a\n\n\n\nb"), "a b");
        assert_eq!(clean_ocr_text("one.. two"), "one.. two");
    }

    #[test]
    fn test_ocr_quality() {
        assert_eq!(ocr_quality(""), OcrQuality::VeryLow);
        assert_eq!(
            ocr_quality("What is the capital city of France and why?"),
            OcrQuality::High
        );
        // One suspicious run in 20 chars: ratio 0.5
        assert_eq!(ocr_quality("ll is a strange word"), OcrQuality::VeryLow);
        // One in 40 chars: ratio 0.25
        assert_eq!(
            ocr_quality("The value 100 appears in this long text."),
            OcrQuality::Medium
        );
    }

    #[test]
    fn test_missing_file() {
        let result = ocr_image(Path::new("/nonexistent/scan.png"), &OcrOptions::default());
        assert!(matches!(result, Err(ProcessError::FileNotFound(_))));
    }

    #[test]
    fn test_tool_check() {
        let _ = which::which("tesseract");
    }
}
