//! Vector store implementations: hosted Qdrant and an in-memory double

use std::env;

use async_trait::async_trait;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, Value, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;

use ragent_core::{Error, Result, SearchConfig, SearchResult, VectorDocument, VectorStore};

/// Configuration for the Qdrant vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub collection: String,
    pub dimensions: usize,
}

impl QdrantConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let url = env::var("QDRANT_URL").unwrap_or_else(|_| "http://localhost:6334".to_string());
        let api_key = env::var("QDRANT_API_KEY").ok();
        let collection = env::var("QDRANT_COLLECTION").unwrap_or_else(|_| "rag-index".to_string());
        let dimensions = env::var("EMBED_DIM")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(384);

        Ok(Self {
            url,
            api_key,
            collection,
            dimensions,
        })
    }
}

/// Vector store backed by a hosted Qdrant collection (cosine distance)
pub struct QdrantVectorStore {
    config: QdrantConfig,
    client: Option<Qdrant>,
}

impl QdrantVectorStore {
    /// Create a new store; call `connect` before use
    pub fn new(config: QdrantConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    /// Create a new store from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(QdrantConfig::from_env()?))
    }

    fn client(&self) -> Result<&Qdrant> {
        self.client
            .as_ref()
            .ok_or_else(|| Error::VectorStore("Vector store not connected".to_string()))
    }

    fn embedding_of(&self, document: &VectorDocument) -> Result<Vec<f32>> {
        let embedding = document
            .embedding
            .clone()
            .ok_or_else(|| Error::VectorStore("Document is missing an embedding".to_string()))?;

        if embedding.len() != self.config.dimensions {
            return Err(Error::VectorStore(format!(
                "Expected {}-dimensional embedding, got {}",
                self.config.dimensions,
                embedding.len()
            )));
        }

        Ok(embedding)
    }

    fn point_from(&self, document: &VectorDocument) -> Result<PointStruct> {
        let embedding = self.embedding_of(document)?;

        let payload = Payload::try_from(json!({
            "content": document.content,
            "source": document.source,
            "chunk_index": document.chunk_index,
        }))
        .map_err(|e| Error::VectorStore(e.to_string()))?;

        Ok(PointStruct::new(document.id.clone(), embedding, payload))
    }
}

fn value_as_string(value: Option<&Value>) -> String {
    match value.and_then(|v| v.kind.as_ref()) {
        Some(Kind::StringValue(s)) => s.clone(),
        _ => String::new(),
    }
}

fn value_as_usize(value: Option<&Value>) -> usize {
    match value.and_then(|v| v.kind.as_ref()) {
        Some(Kind::IntegerValue(i)) => *i as usize,
        _ => 0,
    }
}

fn point_id_string(id: Option<qdrant_client::qdrant::PointId>) -> String {
    match id.and_then(|pid| pid.point_id_options) {
        Some(PointIdOptions::Uuid(uuid)) => uuid,
        Some(PointIdOptions::Num(num)) => num.to_string(),
        None => String::new(),
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn connect(&mut self) -> Result<()> {
        let mut builder = Qdrant::from_url(&self.config.url);
        if let Some(ref api_key) = self.config.api_key {
            builder = builder.api_key(api_key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        let exists = client
            .collection_exists(&self.config.collection)
            .await
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        if !exists {
            client
                .create_collection(
                    CreateCollectionBuilder::new(&self.config.collection).vectors_config(
                        VectorParamsBuilder::new(self.config.dimensions as u64, Distance::Cosine),
                    ),
                )
                .await
                .map_err(|e| Error::VectorStore(e.to_string()))?;
        }

        self.client = Some(client);
        Ok(())
    }

    async fn upsert(&self, document: VectorDocument) -> Result<String> {
        let ids = self.upsert_batch(vec![document]).await?;
        ids.into_iter()
            .next()
            .ok_or_else(|| Error::VectorStore("Upsert returned no id".to_string()))
    }

    async fn upsert_batch(&self, documents: Vec<VectorDocument>) -> Result<Vec<String>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let client = self.client()?;

        let mut ids = Vec::with_capacity(documents.len());
        let mut points = Vec::with_capacity(documents.len());
        for document in &documents {
            ids.push(document.id.clone());
            points.push(self.point_from(document)?);
        }

        client
            .upsert_points(UpsertPointsBuilder::new(&self.config.collection, points).wait(true))
            .await
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        Ok(ids)
    }

    async fn similarity_search(
        &self,
        vector: Vec<f32>,
        config: &SearchConfig,
    ) -> Result<SearchResult> {
        let client = self.client()?;

        let mut builder =
            SearchPointsBuilder::new(&self.config.collection, vector, config.top_k as u64)
                .with_payload(true);
        if let Some(threshold) = config.score_threshold {
            builder = builder.score_threshold(threshold);
        }

        let response = client
            .search_points(builder)
            .await
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        let documents: Vec<VectorDocument> = response
            .result
            .into_iter()
            .map(|point| VectorDocument {
                id: point_id_string(point.id),
                content: value_as_string(point.payload.get("content")),
                source: value_as_string(point.payload.get("source")),
                chunk_index: value_as_usize(point.payload.get("chunk_index")),
                embedding: None,
                score: Some(point.score),
            })
            .collect();

        let total = documents.len();
        Ok(SearchResult { documents, total })
    }

    async fn count(&self) -> Result<usize> {
        let client = self.client()?;

        let response = client
            .count(CountPointsBuilder::new(&self.config.collection).exact(true))
            .await
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        Ok(response.result.map(|r| r.count as usize).unwrap_or(0))
    }

    fn is_connected(&self) -> bool {
        self.client.is_some()
    }
}

/// In-memory vector store used by tests and local development
pub struct MemoryVectorStore {
    documents: RwLock<Vec<VectorDocument>>,
    connected: bool,
}

impl MemoryVectorStore {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
            connected: false,
        }
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn connect(&mut self) -> Result<()> {
        self.connected = true;
        Ok(())
    }

    async fn upsert(&self, document: VectorDocument) -> Result<String> {
        if document.embedding.is_none() {
            return Err(Error::VectorStore(
                "Document is missing an embedding".to_string(),
            ));
        }

        let id = document.id.clone();
        let mut documents = self.documents.write().await;
        if let Some(existing) = documents.iter_mut().find(|d| d.id == document.id) {
            *existing = document;
        } else {
            documents.push(document);
        }
        Ok(id)
    }

    async fn upsert_batch(&self, documents: Vec<VectorDocument>) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(documents.len());
        for document in documents {
            ids.push(self.upsert(document).await?);
        }
        Ok(ids)
    }

    async fn similarity_search(
        &self,
        vector: Vec<f32>,
        config: &SearchConfig,
    ) -> Result<SearchResult> {
        let documents = self.documents.read().await;

        let mut scored: Vec<VectorDocument> = documents
            .iter()
            .filter_map(|doc| {
                let embedding = doc.embedding.as_ref()?;
                let score = cosine_similarity(&vector, embedding);
                if let Some(threshold) = config.score_threshold {
                    if score < threshold {
                        return None;
                    }
                }
                let mut hit = doc.clone();
                hit.score = Some(score);
                Some(hit)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .unwrap_or(0.0)
                .partial_cmp(&a.score.unwrap_or(0.0))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(config.top_k);

        let total = scored.len();
        Ok(SearchResult {
            documents: scored,
            total,
        })
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.documents.read().await.len())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
