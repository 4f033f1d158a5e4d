//! Examdup Core - Domain types shared by the examdup crates.

mod corpus;
mod error;
mod types;

pub use corpus::QuestionCorpus;
pub use error::{Error, Result};
pub use types::*;
