//! Text normalization for comparison.

/// Tokens this short are treated as OCR noise on the fuzzy path.
const MIN_CONTENT_TOKEN_CHARS: usize = 3;

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
    "does", "did", "will", "would", "could", "should", "may", "might", "must", "can", "this",
    "that", "these", "those", "which", "who", "what", "when", "where", "why", "how",
];

/// Canonicalize raw OCR text for comparison.
///
/// Lower-cases, folds accented Latin vowels, drops everything that is not
/// an ASCII word character or whitespace, collapses whitespace runs and
/// trims. The result is idempotent under a second call.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;

    for ch in raw.chars().flat_map(char::to_lowercase) {
        let ch = fold_accent(ch);

        if is_separator(ch) {
            pending_space = true;
            continue;
        }
        if !is_word_char(ch) {
            continue;
        }

        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(ch);
    }

    out
}

/// Whitespace, plus the byte-order mark some scanners leave mid-text.
fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || ch == '\u{feff}'
}

/// Split normalized text into whitespace-delimited tokens.
pub fn tokens(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}

/// Tokens of normalized text long enough to carry content.
pub fn content_tokens(normalized: &str) -> Vec<&str> {
    normalized
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_CONTENT_TOKEN_CHARS)
        .collect()
}

/// Normalize raw text and keep its content tokens.
pub fn extract_tokens(raw: &str) -> Vec<String> {
    content_tokens(&normalize(raw))
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Normalize raw text and drop short tokens and common English stopwords.
pub fn clean_text_for_comparison(raw: &str) -> String {
    content_tokens(&normalize(raw))
        .into_iter()
        .filter(|token| !STOPWORDS.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

fn fold_accent(ch: char) -> char {
    match ch {
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        other => other,
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
