//! Exam code operations.

use crate::database::Database;
use crate::error::{DbError, DbResult};
use chrono::{DateTime, Utc};
use examdup_core::Exam;
use rusqlite::params;

impl Database {
    /// Register a new exam code. Codes are unique.
    pub fn create_exam(&self, exam: &Exam) -> DbResult<()> {
        if self.find_exam(&exam.exam_code)?.is_some() {
            return Err(DbError::Duplicate(format!(
                "Exam code \"{}\" already exists",
                exam.exam_code
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO exams (id, exam_code, created_at) VALUES (?1, ?2, ?3)",
            params![exam.id, exam.exam_code, exam.created_at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Find an exam by its code.
    pub fn find_exam(&self, exam_code: &str) -> DbResult<Option<Exam>> {
        let conn = self.conn()?;
        let result = conn.query_row(
            "SELECT id, exam_code, created_at FROM exams WHERE exam_code = ?1",
            params![exam_code],
            row_to_exam,
        );

        match result {
            Ok(exam) => Ok(Some(exam)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DbError::from(e)),
        }
    }

    /// Get an exam by its code, failing if it is not registered.
    pub fn get_exam(&self, exam_code: &str) -> DbResult<Exam> {
        self.find_exam(exam_code)?
            .ok_or_else(|| DbError::NotFound(format!("Exam code not found: {}", exam_code)))
    }

    /// List all exams, oldest first.
    pub fn list_exams(&self) -> DbResult<Vec<Exam>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, exam_code, created_at FROM exams ORDER BY rowid ASC")?;
        let exams = stmt.query_map([], row_to_exam)?;
        exams.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }
}

fn row_to_exam(row: &rusqlite::Row) -> rusqlite::Result<Exam> {
    let created_at_str: String = row.get(2)?;

    Ok(Exam {
        id: row.get(0)?,
        exam_code: row.get(1)?,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exam_create_and_find() {
        let db = Database::open_in_memory().unwrap();

        let exam = Exam::new("MATH-101").unwrap();
        db.create_exam(&exam).unwrap();

        let fetched = db.get_exam("MATH-101").unwrap();
        assert_eq!(fetched.id, exam.id);
        assert_eq!(fetched.exam_code, "MATH-101");

        assert!(db.find_exam("BIO-200").unwrap().is_none());
        assert!(matches!(db.get_exam("BIO-200"), Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_duplicate_exam_code_is_rejected() {
        let db = Database::open_in_memory().unwrap();

        db.create_exam(&Exam::new("MATH-101").unwrap()).unwrap();
        let err = db.create_exam(&Exam::new("MATH-101").unwrap()).unwrap_err();

        assert!(matches!(err, DbError::Duplicate(_)));
        assert_eq!(err.to_string(), "Exam code \"MATH-101\" already exists");
    }

    #[test]
    fn test_list_exams_in_creation_order() {
        let db = Database::open_in_memory().unwrap();
        for code in ["PHYS", "CHEM", "BIO"] {
            db.create_exam(&Exam::new(code).unwrap()).unwrap();
        }

        let codes: Vec<String> = db
            .list_exams()
            .unwrap()
            .into_iter()
            .map(|e| e.exam_code)
            .collect();
        assert_eq!(codes, vec!["PHYS", "CHEM", "BIO"]);
    }
}
