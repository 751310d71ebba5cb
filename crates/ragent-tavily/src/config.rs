//! Tavily configuration

use std::env;

use ragent_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the Tavily search client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TavilyConfig {
    pub api_key: String,
    pub api_url: String,
    pub max_results: usize,
}

impl TavilyConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = env::var("TAVILY_API_KEY").map_err(|_| {
            Error::Configuration("TAVILY_API_KEY environment variable not found".to_string())
        })?;

        let api_url =
            env::var("TAVILY_API_URL").unwrap_or_else(|_| "https://api.tavily.com".to_string());

        let max_results = env::var("TAVILY_MAX_RESULTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            api_key,
            api_url,
            max_results,
        })
    }

    /// Create configuration with explicit values
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            api_url: "https://api.tavily.com".to_string(),
            max_results: 5,
        }
    }
}
