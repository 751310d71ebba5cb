//! Query-time retrieval over the vector store

use std::sync::Arc;

use async_trait::async_trait;

use ragent_core::{
    EmbeddingProvider, RagRetriever, Result, RetrievalResult, SearchConfig, VectorDocument,
    VectorStore,
};

/// Retriever that embeds a query and runs a similarity search
pub struct Retriever<V: VectorStore, E: EmbeddingProvider> {
    vector_store: Arc<V>,
    embedder: Arc<E>,
    score_threshold: Option<f32>,
}

impl<V: VectorStore, E: EmbeddingProvider> Retriever<V, E> {
    pub fn new(vector_store: Arc<V>, embedder: Arc<E>) -> Self {
        Self {
            vector_store,
            embedder,
            score_threshold: None,
        }
    }

    /// Drop hits scoring below the threshold
    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = Some(threshold);
        self
    }
}

/// Concatenate retrieved chunks into a prompt-ready context block
fn build_context(chunks: &[VectorDocument]) -> String {
    if chunks.is_empty() {
        return String::new();
    }

    let mut context = String::from("Relevant knowledge base excerpts:\n\n");
    for (i, chunk) in chunks.iter().enumerate() {
        context.push_str(&format!("{}. [{}] {}\n\n", i + 1, chunk.source, chunk.content));
    }
    context
}

#[async_trait]
impl<V: VectorStore + 'static, E: EmbeddingProvider + 'static> RagRetriever for Retriever<V, E> {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<RetrievalResult> {
        let query_vector = self.embedder.embed(query).await?;

        let config = SearchConfig {
            top_k,
            score_threshold: self.score_threshold,
        };
        let search_result = self
            .vector_store
            .similarity_search(query_vector, &config)
            .await?;

        let context = build_context(&search_result.documents);

        Ok(RetrievalResult {
            chunks: search_result.documents,
            context,
        })
    }
}
