//! Error types shared across the ragent workspace

use thiserror::Error;

/// Result alias used by every ragent crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by ragent components
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("LLM provider error: {0}")]
    LlmProvider(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Web search error: {0}")]
    WebSearch(String),

    #[error("Ingestion error: {0}")]
    Ingestion(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
