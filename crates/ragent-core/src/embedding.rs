//! Embedding provider trait

use async_trait::async_trait;

use crate::Result;

/// Trait for hosted embedding models
///
/// Vectors returned by `embed` and `embed_batch` must have exactly
/// `dimensions()` components; vector stores reject anything else.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed multiple texts in one call
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Dimensionality of the produced vectors
    fn dimensions(&self) -> usize;

    /// Name of the underlying model
    fn model_name(&self) -> &str;
}
