//! Error types for Tally

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    /// The external model answered with a non-success status or an unusable body
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The external model stopped early (token limit)
    #[error("Generation truncated: {0}")]
    Truncated(String),

    #[error("Timed out after {0}s")]
    Timeout(u64),
}

pub type Result<T> = std::result::Result<T, Error>;
