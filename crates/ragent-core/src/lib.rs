//! Core traits and types for ragent
//!
//! This crate defines the fundamental traits and types used across the ragent system.
//! It provides capability-facing interfaces for LLM providers, embedding providers,
//! vector stores, web search, retrieval, and document indexing, making every external
//! service swappable and test-friendly.

pub mod llm;
pub mod embedding;
pub mod vector_store;
pub mod web_search;
pub mod retrieval;
pub mod indexer;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use llm::{LlmProvider, GenerationConfig, GenerationResult};
pub use embedding::EmbeddingProvider;
pub use vector_store::{VectorStore, VectorDocument, SearchResult, SearchConfig};
pub use web_search::{WebSearchProvider, WebSnippet};
pub use retrieval::{RagRetriever, RetrievalResult};
pub use indexer::{DocumentIndexer, IndexingResult, IndexingConfig};
pub use types::*;
