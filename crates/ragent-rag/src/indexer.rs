//! Ingestion pipeline: chunk, embed, upsert

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;
use uuid::Uuid;

use ragent_core::{
    DocumentIndexer, EmbeddingProvider, Error, IndexingConfig, IndexingResult, Result,
    VectorDocument, VectorStore,
};

use crate::chunker::TextChunker;
use crate::pdf::extract_pdf_text;

/// Indexer that splits content into chunks, embeds them, and upserts the
/// result into a vector store
pub struct ChunkIndexer<V: VectorStore, E: EmbeddingProvider> {
    vector_store: Arc<V>,
    embedder: Arc<E>,
    config: IndexingConfig,
    http: reqwest::Client,
}

impl<V: VectorStore, E: EmbeddingProvider> ChunkIndexer<V, E> {
    /// Create a new indexer with the default chunking configuration
    pub fn new(vector_store: Arc<V>, embedder: Arc<E>) -> Self {
        Self::with_config(vector_store, embedder, IndexingConfig::default())
    }

    /// Create a new indexer with an explicit chunking configuration
    pub fn with_config(vector_store: Arc<V>, embedder: Arc<E>, config: IndexingConfig) -> Self {
        Self {
            vector_store,
            embedder,
            config,
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }
}

/// Deterministic chunk id: re-ingesting the same content under the same
/// source overwrites instead of duplicating
fn chunk_id(source: &str, index: usize, text: &str) -> String {
    let digest = md5::compute(format!("{}:{}:{}", source, index, text));
    Uuid::from_bytes(digest.0).to_string()
}

/// Reduce an HTML page to its readable text
fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let selector = Selector::parse("p, h1, h2, h3, h4, li, td, pre")
        .expect("static selector is valid");

    let mut parts: Vec<String> = Vec::new();
    for element in document.select(&selector) {
        let text: String = element.text().collect::<Vec<_>>().join(" ");
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !text.is_empty() {
            parts.push(text);
        }
    }

    parts.join("\n\n")
}

#[async_trait]
impl<V: VectorStore + 'static, E: EmbeddingProvider + 'static> DocumentIndexer
    for ChunkIndexer<V, E>
{
    async fn index_text(&self, content: &str, source: &str) -> Result<IndexingResult> {
        if content.trim().is_empty() {
            return Err(Error::Ingestion("Document content is empty".to_string()));
        }

        let chunker = TextChunker::new(self.config.chunk_size, self.config.chunk_overlap);
        let chunks = chunker.chunk(content);

        if chunks.is_empty() {
            return Err(Error::Ingestion(
                "Document produced no indexable chunks".to_string(),
            ));
        }

        let mut chunks_indexed = 0;
        for batch in chunks.chunks(self.config.batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;

            let documents: Vec<VectorDocument> = batch
                .iter()
                .zip(embeddings.into_iter())
                .map(|(chunk, embedding)| VectorDocument {
                    id: chunk_id(source, chunk.index, &chunk.text),
                    content: chunk.text.clone(),
                    source: source.to_string(),
                    chunk_index: chunk.index,
                    embedding: Some(embedding),
                    score: None,
                })
                .collect();

            chunks_indexed += documents.len();
            self.vector_store.upsert_batch(documents).await?;
        }

        Ok(IndexingResult {
            source: source.to_string(),
            chunks_indexed,
        })
    }

    async fn index_file(&self, path: &str) -> Result<IndexingResult> {
        let file_path = Path::new(path);
        let source = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path)
            .to_string();

        let is_pdf = file_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);

        let content = if is_pdf {
            let bytes = tokio::fs::read(file_path).await?;
            extract_pdf_text(&bytes)?
        } else {
            tokio::fs::read_to_string(file_path).await?
        };

        self.index_text(&content, &source).await
    }

    async fn index_url(&self, url: &str) -> Result<IndexingResult> {
        let parsed =
            Url::parse(url).map_err(|e| Error::Ingestion(format!("Invalid URL: {}", e)))?;

        let response = self
            .http
            .get(parsed.clone())
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Ingestion(format!(
                "Fetching {} failed with status {}",
                url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let content = html_to_text(&body);
        if content.trim().is_empty() {
            return Err(Error::Ingestion(format!(
                "No readable text found at {}",
                url
            )));
        }

        self.index_text(&content, parsed.as_str()).await
    }
}
