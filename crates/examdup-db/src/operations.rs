//! Database CRUD operations.

pub mod corpus;
pub mod exams;
pub mod questions;
pub mod stats;
