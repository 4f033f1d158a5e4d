//! Corpus access seam between storage and the matching engine.

use crate::error::Result;
use crate::types::CorpusEntry;

/// Read access to the stored questions a query is matched against.
///
/// Callers fetch a snapshot through this trait and hand the entries to the
/// matcher; the matcher itself never touches storage.
pub trait QuestionCorpus {
    /// All stored questions, oldest first.
    fn all_entries(&self) -> Result<Vec<CorpusEntry>>;

    /// Stored questions for one exam code, oldest first.
    fn entries_for_exam(&self, exam_code: &str) -> Result<Vec<CorpusEntry>>;
}
