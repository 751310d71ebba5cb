//! Groq configuration

use std::env;

use ragent_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the Groq chat-completion client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
}

impl GroqConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = env::var("GROQ_API_KEY").map_err(|_| {
            Error::Configuration("GROQ_API_KEY environment variable not found".to_string())
        })?;

        let api_url = env::var("GROQ_API_URL")
            .unwrap_or_else(|_| "https://api.groq.com/openai/v1".to_string());

        let model =
            env::var("GROQ_MODEL").unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string());

        Ok(Self {
            api_key,
            api_url,
            model,
        })
    }

    /// Create configuration with explicit values
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            api_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
        }
    }
}
