//! Tavily search client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use ragent_core::{Error, Result, WebSearchProvider, WebSnippet};

use crate::config::TavilyConfig;

/// Tavily web-search client
pub struct TavilyClient {
    config: TavilyConfig,
    client: Client,
}

#[derive(Serialize)]
struct SearchRequest {
    api_key: String,
    query: String,
    search_depth: String,
    max_results: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResultEntry>,
}

#[derive(Deserialize)]
struct SearchResultEntry {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    score: Option<f32>,
}

impl TavilyClient {
    /// Create a new Tavily client from configuration
    pub fn new(config: TavilyConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a new Tavily client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = TavilyConfig::from_env()?;
        Self::new(config)
    }
}

/// Convert a raw response body into ranked snippets
fn parse_search_response(body: &str) -> Result<Vec<WebSnippet>> {
    let parsed: SearchResponse =
        serde_json::from_str(body).map_err(|e| Error::Serialization(e.to_string()))?;

    Ok(parsed
        .results
        .into_iter()
        .filter(|r| !r.content.is_empty())
        .map(|r| WebSnippet {
            title: r.title,
            url: r.url,
            content: r.content,
            score: r.score,
        })
        .collect())
}

#[async_trait]
impl WebSearchProvider for TavilyClient {
    async fn search(&self, query: &str) -> Result<Vec<WebSnippet>> {
        let request_body = SearchRequest {
            api_key: self.config.api_key.clone(),
            query: query.to_string(),
            search_depth: "basic".to_string(),
            max_results: self.config.max_results,
        };

        let url = format!("{}/search", self.config.api_url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication(
                "Tavily rejected the API key".to_string(),
            ));
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::WebSearch(format!(
                "Tavily API request failed with status {}: {}",
                status, error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        parse_search_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let body = r#"{
            "query": "rust programming language",
            "results": [
                {"title": "Rust", "url": "https://www.rust-lang.org", "content": "A language empowering everyone.", "score": 0.97},
                {"title": "Rust book", "url": "https://doc.rust-lang.org/book", "content": "The Rust Programming Language.", "score": 0.91}
            ],
            "response_time": 1.2
        }"#;

        let snippets = parse_search_response(body).unwrap();
        assert_eq!(snippets.len(), 2);
        assert_eq!(snippets[0].title, "Rust");
        assert_eq!(snippets[0].score, Some(0.97));
    }

    #[test]
    fn test_parse_search_response_drops_empty_content() {
        let body = r#"{"results": [
            {"title": "empty", "url": "https://example.com", "content": ""},
            {"title": "kept", "url": "https://example.org", "content": "something"}
        ]}"#;

        let snippets = parse_search_response(body).unwrap();
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].title, "kept");
    }

    #[test]
    fn test_parse_search_response_no_results() {
        let snippets = parse_search_response(r#"{"query": "x"}"#).unwrap();
        assert!(snippets.is_empty());
    }
}
