//! Custom error types for paperdex

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for paperdex operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0} is not a valid directory")]
    NotADirectory(PathBuf),

    #[error("The specified index file does not exist: {0}")]
    IndexNotFound(PathBuf),

    #[error("Could not load index: {0}")]
    Deserialize(String),

    #[error("Error saving index: {0}")]
    Persistence(String),

    #[error("PDF extraction error: {0}")]
    Pdf(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

/// Result type alias for paperdex
pub type Result<T> = std::result::Result<T, Error>;
