//! Web search provider trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A single ranked snippet returned by the search API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSnippet {
    pub title: String,
    pub url: String,
    pub content: String,
    pub score: Option<f32>,
}

/// Trait for hosted web-search APIs
#[async_trait]
pub trait WebSearchProvider: Send + Sync {
    /// Search the web; snippets come back in provider ranking order
    async fn search(&self, query: &str) -> Result<Vec<WebSnippet>>;
}
