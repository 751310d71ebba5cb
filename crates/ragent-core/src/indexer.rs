//! Document indexer trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Result of an ingestion operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingResult {
    pub source: String,
    pub chunks_indexed: usize,
}

/// Configuration for document chunking and ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub batch_size: usize,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            batch_size: 16,
        }
    }
}

/// Trait for document indexers
///
/// Indexers split raw content into chunks, embed them, and upsert the
/// result into a vector store. Ingestion failures surface as errors with
/// no partial-state cleanup beyond what the store itself provides.
#[async_trait]
pub trait DocumentIndexer: Send + Sync {
    /// Index raw text under a source name
    async fn index_text(&self, content: &str, source: &str) -> Result<IndexingResult>;

    /// Index a local file (PDF or plain text, by extension)
    async fn index_file(&self, path: &str) -> Result<IndexingResult>;

    /// Index a web page by URL
    async fn index_url(&self, url: &str) -> Result<IndexingResult>;
}
