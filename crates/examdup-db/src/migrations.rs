//! Database migrations and schema management.

use crate::error::{DbError, DbResult};
use rusqlite::Connection;
use tracing::info;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema.
pub fn initialize_schema(conn: &Connection) -> DbResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Creating initial database schema...");
        create_initial_schema(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version > SCHEMA_VERSION {
        return Err(DbError::Migration(format!(
            "database schema version {} is newer than supported version {}",
            current_version, SCHEMA_VERSION
        )));
    }

    Ok(())
}

fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> DbResult<()> {
    conn.pragma_update(None, "user_version", version)?;
    Ok(())
}

fn create_initial_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- Registered exam codes
        CREATE TABLE IF NOT EXISTS exams (
            id TEXT PRIMARY KEY,
            exam_code TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        );

        -- Uploaded question scans and their OCR output
        CREATE TABLE IF NOT EXISTS questions (
            id TEXT PRIMARY KEY,
            exam_code TEXT NOT NULL REFERENCES exams(exam_code) ON DELETE CASCADE,
            image_url TEXT NOT NULL,
            image_hash TEXT,
            extracted_text TEXT NOT NULL,
            normalized_text TEXT NOT NULL DEFAULT '',
            ocr_confidence REAL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_questions_exam ON questions(exam_code);
        CREATE INDEX IF NOT EXISTS idx_questions_created ON questions(created_at DESC);
        CREATE INDEX IF NOT EXISTS idx_questions_exam_created ON questions(exam_code, created_at DESC);
        CREATE INDEX IF NOT EXISTS idx_questions_hash ON questions(image_hash);
        "#,
    )?;

    Ok(())
}
