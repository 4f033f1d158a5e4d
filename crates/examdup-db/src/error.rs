//! Database error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Database error: {0}")]
    Other(String),
}

pub type DbResult<T> = Result<T, DbError>;

impl From<DbError> for examdup_core::Error {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(msg) => examdup_core::Error::NotFound(msg),
            DbError::Duplicate(msg) | DbError::InvalidInput(msg) => {
                examdup_core::Error::InvalidInput(msg)
            }
            other => examdup_core::Error::Storage(other.to_string()),
        }
    }
}
