//! Examdup DB - SQLite storage for exams and question scans.

mod database;
mod error;
mod migrations;
mod operations;

pub use database::Database;
pub use error::{DbError, DbResult};
