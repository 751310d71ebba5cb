//! HTTP client for the ragent backend

use std::path::Path;
use std::time::Duration;

use reqwest::multipart;
use serde::{Deserialize, Serialize};

use ragent_core::{Error, Result, TraceEvent};

/// Client for the ragent chat and ingestion endpoints
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    session_id: &'a str,
    query: &'a str,
    enable_web_search: bool,
}

/// Answer plus decision trace for one turn
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub trace_events: Vec<TraceEvent>,
}

/// Result of a document upload
#[derive(Debug, Clone, Deserialize)]
pub struct UploadReply {
    pub message: String,
    pub filename: String,
    pub processed_chunks: usize,
}

impl ApiClient {
    /// Create a client for a backend base URL (e.g. `http://localhost:8000`)
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Send a chat query and return the answer with its trace
    pub async fn chat(
        &self,
        session_id: &str,
        query: &str,
        enable_web_search: bool,
    ) -> Result<ChatReply> {
        let request = ChatRequest {
            session_id,
            query,
            enable_web_search,
        };

        let response = self
            .client
            .post(format!("{}/chat/", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Agent(format!(
                "Chat request failed with status {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Upload a PDF into the knowledge base
    pub async fn upload_document(&self, path: &str) -> Result<UploadReply> {
        let filename = Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path)
            .to_string();

        let bytes = tokio::fs::read(path).await?;
        let part = multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str("application/pdf")
            .map_err(|e| Error::Ingestion(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/upload-document/", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Ingestion(format!(
                "Upload failed with status {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Probe the backend liveness endpoint
    pub async fn health(&self) -> Result<serde_json::Value> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Network(format!(
                "Backend health check failed with status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))
    }
}
