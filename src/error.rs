//! Error types for Husk.

use thiserror::Error;

/// Library-level error type for Husk operations.
#[derive(Error, Debug)]
pub enum HuskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Subtitle parse error: {0}")]
    Subtitle(String),

    #[error("Summarization failed: {0}")]
    Summarize(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Language model API error: {0}")]
    OpenAI(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Husk operations.
pub type Result<T> = std::result::Result<T, HuskError>;
