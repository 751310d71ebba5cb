//! Retrieval stack for ragent
//!
//! This crate provides the hosted-embedding client, vector store
//! implementations, the text chunker, the ingestion pipeline, and the
//! retriever used by the agent graph.

mod chunker;
mod embedder;
mod indexer;
mod pdf;
mod retriever;
mod vector_store;


pub use chunker::{Chunk, TextChunker};
pub use embedder::{HfConfig, HfEmbedder};
pub use indexer::ChunkIndexer;
pub use pdf::extract_pdf_text;
pub use retriever::Retriever;
pub use vector_store::{MemoryVectorStore, QdrantConfig, QdrantVectorStore};

// Re-export core types for convenience
pub use ragent_core::{
    DocumentIndexer, EmbeddingProvider, Error, IndexingConfig, IndexingResult, RagRetriever,
    Result, RetrievalResult, SearchConfig, SearchResult, VectorDocument, VectorStore,
};
