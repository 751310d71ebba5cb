//! Hosted embedding client (Hugging Face Inference API)

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use ragent_core::{EmbeddingProvider, Error, Result};

/// Configuration for the hosted embedding model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HfConfig {
    pub api_token: String,
    pub api_url: String,
    pub model: String,
    pub dimensions: usize,
}

impl HfConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_token = env::var("HF_API_TOKEN").map_err(|_| {
            Error::Configuration("HF_API_TOKEN environment variable not found".to_string())
        })?;

        let api_url = env::var("HF_API_URL")
            .unwrap_or_else(|_| "https://api-inference.huggingface.co".to_string());

        let model = env::var("EMBED_MODEL")
            .unwrap_or_else(|_| "sentence-transformers/all-MiniLM-L6-v2".to_string());

        let dimensions = env::var("EMBED_DIM")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(384);

        Ok(Self {
            api_token,
            api_url,
            model,
            dimensions,
        })
    }

    /// Create configuration with explicit values
    pub fn new(api_token: String) -> Self {
        Self {
            api_token,
            api_url: "https://api-inference.huggingface.co".to_string(),
            model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            dimensions: 384,
        }
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [String],
    options: EmbedOptions,
}

#[derive(Serialize)]
struct EmbedOptions {
    wait_for_model: bool,
}

/// Embedding client backed by the Hugging Face feature-extraction pipeline
pub struct HfEmbedder {
    config: HfConfig,
    client: Client,
}

impl HfEmbedder {
    /// Create a new embedder from configuration
    pub fn new(config: HfConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a new embedder from environment variables
    pub fn from_env() -> Result<Self> {
        let config = HfConfig::from_env()?;
        Self::new(config)
    }

    async fn request_embeddings(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!(
            "{}/pipeline/feature-extraction/{}",
            self.config.api_url, self.config.model
        );

        let request_body = EmbedRequest {
            inputs: texts,
            options: EmbedOptions {
                wait_for_model: true,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_token))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication(
                "Hugging Face rejected the API token".to_string(),
            ));
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Embedding(format!(
                "Embedding request failed with status {}: {}",
                status, error_text
            )));
        }

        let vectors: Vec<Vec<f32>> = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        if vectors.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }

        for vector in &vectors {
            if vector.len() != self.config.dimensions {
                return Err(Error::Embedding(format!(
                    "Expected {}-dimensional embedding, got {}",
                    self.config.dimensions,
                    vector.len()
                )));
            }
        }

        Ok(vectors)
    }
}

#[async_trait]
impl EmbeddingProvider for HfEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let texts = vec![text.to_string()];
        let mut vectors = self.request_embeddings(&texts).await?;
        vectors
            .pop()
            .ok_or_else(|| Error::Embedding("Empty embedding response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request_embeddings(texts).await
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = HfConfig::new("test_token".to_string());
        assert_eq!(config.model, "sentence-transformers/all-MiniLM-L6-v2");
        assert_eq!(config.dimensions, 384);
    }
}
