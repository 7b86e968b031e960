//! Error types for the Enterprise QnA services.
//!
//! One unified error enum covers every failure category: configuration,
//! I/O, the three hosted backends (embedding, search, generation), the
//! ingestion pipeline, and prompt rendering.

use thiserror::Error;

/// Unified error type for the Enterprise QnA services.
///
/// All fallible functions return `Result<T, AppError>`. Backend failures
/// are wrapped with their category but otherwise propagated unmodified:
/// there is no retry, backoff, or fallback anywhere in this codebase.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or invalid configuration, fatal at construction
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Embedding backend errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Search backend errors (queries and document retrieval)
    #[error("Search error: {0}")]
    Search(String),

    /// Generation backend errors
    #[error("Generation error: {0}")]
    Generation(String),

    /// Index provisioning and indexer errors
    #[error("Ingestion error: {0}")]
    Ingestion(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
