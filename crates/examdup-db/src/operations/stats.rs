//! Database statistics operations.

use crate::database::Database;
use crate::error::DbResult;
use examdup_core::{ExamSummary, Stats};

impl Database {
    /// Count exams and questions, with a per-exam breakdown.
    pub fn get_stats(&self) -> DbResult<Stats> {
        let conn = self.conn()?;

        let total_exams: i64 = conn.query_row("SELECT COUNT(*) FROM exams", [], |row| row.get(0))?;

        let total_questions: i64 =
            conn.query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))?;

        // Exams with no questions still show up with a zero count.
        let mut stmt = conn.prepare(
            r#"
            SELECT e.exam_code, COUNT(q.id)
            FROM exams e
            LEFT JOIN questions q ON q.exam_code = e.exam_code
            GROUP BY e.exam_code
            ORDER BY e.rowid ASC
            "#,
        )?;
        let exams = stmt
            .query_map([], |row| {
                Ok(ExamSummary {
                    exam_code: row.get(0)?,
                    question_count: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Stats {
            total_exams,
            total_questions,
            exams,
        })
    }
}
