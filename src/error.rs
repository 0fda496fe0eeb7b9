//! Error types for knowledge-base loading and the command-line front end.
//!
//! The matching core itself is total: degenerate queries and empty knowledge
//! bases produce "no match", never an error.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("Failed to read stdin: {0}")]
    StdinRead(#[from] io::Error),

    #[error("Failed to encode or decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read knowledge base from {path}: {source}")]
    KnowledgeBaseRead { path: PathBuf, source: io::Error },

    #[error("Failed to parse knowledge base: {0}")]
    KnowledgeBaseParse(String),

    #[error("Knowledge base not found at {0}")]
    KnowledgeBaseNotFound(PathBuf),

    #[error("Config directory not found")]
    NoConfigDir,

    #[error("Entry #{index} has an empty `{field}` field")]
    InvalidEntry { index: usize, field: &'static str },

    #[error("Duplicate entry id: {0}")]
    DuplicateId(String),
}
