//! Question CRUD operations.

use crate::database::Database;
use crate::error::{DbError, DbResult};
use chrono::{DateTime, Utc};
use examdup_core::Question;
use rusqlite::params;

const QUESTION_COLUMNS: &str = "id, exam_code, image_url, image_hash, extracted_text, \
     normalized_text, ocr_confidence, created_at";

impl Database {
    /// Store a question under an existing exam code.
    pub fn create_question(&self, question: &Question) -> DbResult<()> {
        self.get_exam(&question.exam_code)?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO questions (id, exam_code, image_url, image_hash, extracted_text,
                                   normalized_text, ocr_confidence, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                question.id,
                question.exam_code,
                question.image_url,
                question.image_hash,
                question.extracted_text,
                question.normalized_text,
                question.ocr_confidence,
                question.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a question by ID.
    pub fn get_question(&self, id: &str) -> DbResult<Question> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM questions WHERE id = ?1", QUESTION_COLUMNS),
            params![id],
            row_to_question,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                DbError::NotFound(format!("Question not found: {}", id))
            }
            _ => DbError::from(e),
        })
    }

    /// Get a question by ID prefix.
    ///
    /// Useful for CLI where users can type partial IDs. The prefix is
    /// compared literally, so `%` and `_` carry no pattern meaning.
    pub fn get_question_by_prefix(&self, prefix: &str) -> DbResult<Question> {
        if prefix.trim().is_empty() {
            return Err(DbError::InvalidInput(
                "Question ID prefix must not be empty".to_string(),
            ));
        }

        if let Ok(question) = self.get_question(prefix) {
            return Ok(question);
        }

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM questions WHERE substr(id, 1, length(?1)) = ?1 LIMIT 2",
            QUESTION_COLUMNS
        ))?;

        let mut questions: Vec<Question> = stmt
            .query_map(params![prefix], row_to_question)?
            .collect::<Result<Vec<_>, _>>()?;

        match questions.len() {
            0 => Err(DbError::NotFound(format!("Question not found: {}", prefix))),
            1 => Ok(questions.remove(0)),
            _ => Err(DbError::InvalidInput(format!(
                "Ambiguous ID prefix '{}': multiple questions match",
                prefix
            ))),
        }
    }

    /// Questions stored under one exam code, oldest first.
    pub fn list_questions(&self, exam_code: &str) -> DbResult<Vec<Question>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM questions WHERE exam_code = ?1 ORDER BY rowid ASC",
            QUESTION_COLUMNS
        ))?;
        let questions = stmt.query_map(params![exam_code], row_to_question)?;
        questions.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// All stored questions, oldest first.
    pub fn all_questions(&self) -> DbResult<Vec<Question>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM questions ORDER BY rowid ASC",
            QUESTION_COLUMNS
        ))?;
        let questions = stmt.query_map([], row_to_question)?;
        questions.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Number of questions stored under one exam code.
    pub fn count_questions(&self, exam_code: &str) -> DbResult<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM questions WHERE exam_code = ?1",
            params![exam_code],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete a question, returning the removed row.
    pub fn delete_question(&self, id: &str) -> DbResult<Question> {
        let question = self.get_question(id)?;

        let conn = self.conn()?;
        conn.execute("DELETE FROM questions WHERE id = ?1", params![id])?;

        Ok(question)
    }
}

fn row_to_question(row: &rusqlite::Row) -> rusqlite::Result<Question> {
    let created_at_str: String = row.get(7)?;

    Ok(Question {
        id: row.get(0)?,
        exam_code: row.get(1)?,
        image_url: row.get(2)?,
        image_hash: row.get(3)?,
        extracted_text: row.get(4)?,
        normalized_text: row.get(5)?,
        ocr_confidence: row.get::<_, Option<f64>>(6)?.map(|c| c as f32),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use examdup_core::Exam;

    fn db_with_exam(code: &str) -> Database {
        let db = Database::open_in_memory().unwrap();
        db.create_exam(&Exam::new(code).unwrap()).unwrap();
        db
    }

    #[test]
    fn test_question_crud() {
        let db = db_with_exam("MATH-101");

        let question = Question::new("MATH-101", "uploads/q1.png", "What is 2 + 2?")
            .with_normalized_text("what is 2 2")
            .with_image_hash("ab12")
            .with_ocr_confidence(Some(91.5));
        db.create_question(&question).unwrap();

        let fetched = db.get_question(&question.id).unwrap();
        assert_eq!(fetched.extracted_text, "What is 2 + 2?");
        assert_eq!(fetched.normalized_text, "what is 2 2");
        assert_eq!(fetched.image_hash.as_deref(), Some("ab12"));
        assert_eq!(fetched.ocr_confidence, Some(91.5));

        let deleted = db.delete_question(&question.id).unwrap();
        assert_eq!(deleted.image_url, "uploads/q1.png");
        assert!(matches!(
            db.get_question(&question.id),
            Err(DbError::NotFound(_))
        ));
        assert!(matches!(
            db.delete_question(&question.id),
            Err(DbError::NotFound(_))
        ));
    }

    #[test]
    fn test_question_requires_registered_exam() {
        let db = db_with_exam("MATH-101");
        let question = Question::new("UNKNOWN", "uploads/q1.png", "text");
        assert!(matches!(
            db.create_question(&question),
            Err(DbError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_and_count_by_exam() {
        let db = db_with_exam("MATH-101");
        db.create_exam(&Exam::new("BIO-200").unwrap()).unwrap();

        for text in ["first", "second"] {
            db.create_question(&Question::new("MATH-101", "u.png", text))
                .unwrap();
        }
        db.create_question(&Question::new("BIO-200", "u.png", "cell"))
            .unwrap();

        let math: Vec<String> = db
            .list_questions("MATH-101")
            .unwrap()
            .into_iter()
            .map(|q| q.extracted_text)
            .collect();
        assert_eq!(math, vec!["first", "second"]);
        assert_eq!(db.count_questions("MATH-101").unwrap(), 2);
        assert_eq!(db.count_questions("BIO-200").unwrap(), 1);
        assert_eq!(db.all_questions().unwrap().len(), 3);
    }

    #[test]
    fn test_get_question_by_prefix() {
        let db = db_with_exam("MATH-101");
        let question = Question::new("MATH-101", "u.png", "text");
        db.create_question(&question).unwrap();

        let fetched = db.get_question_by_prefix(&question.id[..8]).unwrap();
        assert_eq!(fetched.id, question.id);
        assert!(db.get_question_by_prefix("zzzz").is_err());
    }

    #[test]
    fn test_prefix_lookup_treats_wildcards_literally() {
        let db = db_with_exam("MATH-101");
        let first = Question::new("MATH-101", "a.png", "first");
        let second = Question::new("MATH-101", "b.png", "second");
        db.create_question(&first).unwrap();
        db.create_question(&second).unwrap();

        assert!(matches!(
            db.get_question_by_prefix(""),
            Err(DbError::InvalidInput(_))
        ));
        assert!(matches!(
            db.get_question_by_prefix("   "),
            Err(DbError::InvalidInput(_))
        ));
        assert!(matches!(
            db.get_question_by_prefix("%"),
            Err(DbError::NotFound(_))
        ));
        assert!(matches!(
            db.get_question_by_prefix("________"),
            Err(DbError::NotFound(_))
        ));

        let fetched = db.get_question_by_prefix(&second.id[..8]).unwrap();
        assert_eq!(fetched.id, second.id);
    }
}
