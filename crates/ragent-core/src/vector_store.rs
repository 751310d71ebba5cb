//! Vector store trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A document chunk stored in the vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorDocument {
    pub id: String,
    pub content: String,
    pub source: String,
    pub chunk_index: usize,
    pub embedding: Option<Vec<f32>>,
    pub score: Option<f32>,
}

/// Search result from the vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub documents: Vec<VectorDocument>,
    pub total: usize,
}

/// Configuration for similarity search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub top_k: usize,
    pub score_threshold: Option<f32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            score_threshold: None,
        }
    }
}

/// Trait for vector stores (e.g., Qdrant, Pinecone)
///
/// The store is append-only at ingestion time and read-only at query time.
/// Embedding happens outside the store; every operation works on vectors.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Initialize the connection and make sure the backing collection exists
    async fn connect(&mut self) -> Result<()>;

    /// Upsert a single document; returns the stored id
    async fn upsert(&self, document: VectorDocument) -> Result<String>;

    /// Upsert multiple documents in batch
    async fn upsert_batch(&self, documents: Vec<VectorDocument>) -> Result<Vec<String>>;

    /// Similarity search by embedding vector
    async fn similarity_search(&self, vector: Vec<f32>, config: &SearchConfig)
        -> Result<SearchResult>;

    /// Total number of stored documents
    async fn count(&self) -> Result<usize>;

    /// Whether the store has been connected
    fn is_connected(&self) -> bool;
}
