//! Retrieval trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Result, VectorDocument};

/// Result of a retrieval pass: the raw chunks plus a prompt-ready context block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub chunks: Vec<VectorDocument>,
    pub context: String,
}

impl RetrievalResult {
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Trait for retrievers that turn a query into ranked document chunks
///
/// Implementations embed the query and run a similarity search; the agent
/// graph only sees this seam, so tests can script retrieval outcomes.
#[async_trait]
pub trait RagRetriever: Send + Sync {
    /// Retrieve the `top_k` most similar chunks for a query
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<RetrievalResult>;
}
