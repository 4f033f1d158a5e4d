//! Corpus view of stored questions for the matching engine.

use crate::database::Database;
use examdup_core::{CorpusEntry, QuestionCorpus, Result};

impl QuestionCorpus for Database {
    fn all_entries(&self) -> Result<Vec<CorpusEntry>> {
        let questions = self.all_questions()?;
        Ok(questions.iter().map(|q| q.to_corpus_entry()).collect())
    }

    fn entries_for_exam(&self, exam_code: &str) -> Result<Vec<CorpusEntry>> {
        let questions = self.list_questions(exam_code)?;
        Ok(questions.iter().map(|q| q.to_corpus_entry()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use examdup_core::{Exam, Question};

    #[test]
    fn test_corpus_preserves_insertion_order() {
        let db = Database::open_in_memory().unwrap();
        db.create_exam(&Exam::new("A").unwrap()).unwrap();
        db.create_exam(&Exam::new("B").unwrap()).unwrap();

        let first = Question::new("A", "1.png", "first question");
        let second = Question::new("B", "2.png", "second question");
        let third = Question::new("A", "3.png", "third question");
        for q in [&first, &second, &third] {
            db.create_question(q).unwrap();
        }

        let all = db.all_entries().unwrap();
        let ids: Vec<&str> = all.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec![first.id.as_str(), second.id.as_str(), third.id.as_str()]);
        assert_eq!(all[0].raw_text, "first question");
        assert_eq!(all[0].image_url, "1.png");

        let only_a = db.entries_for_exam("A").unwrap();
        assert_eq!(only_a.len(), 2);
        assert!(only_a.iter().all(|e| e.exam_code == "A"));
    }
}
