//! Groq chat-completion client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;

use ragent_core::{Error, GenerationConfig, GenerationResult, LlmProvider, Result};

use crate::config::GroqConfig;

/// Groq chat-completion client (OpenAI-compatible endpoint)
pub struct GroqClient {
    config: GroqConfig,
    client: Client,
    current_model: String,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

impl GroqClient {
    /// Model constants
    pub const LLAMA_3_3_70B_VERSATILE: &'static str = "llama-3.3-70b-versatile";
    pub const LLAMA_3_1_8B_INSTANT: &'static str = "llama-3.1-8b-instant";

    /// Create a new Groq client from configuration
    pub fn new(config: GroqConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        let current_model = config.model.clone();

        Ok(Self {
            config,
            client,
            current_model,
        })
    }

    /// Create a new Groq client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = GroqConfig::from_env()?;
        Self::new(config)
    }

    /// Set the model to use for generation
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.current_model = model_id.into();
        self
    }

    /// Verify the endpoint is reachable and the API key is accepted
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/models", self.config.api_url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication(
                "Groq rejected the API key".to_string(),
            ));
        }

        if !response.status().is_success() {
            return Err(Error::LlmProvider(format!(
                "Groq health check failed with status {}",
                response.status()
            )));
        }

        Ok(())
    }

    /// Perform the actual generation request
    async fn perform_generation(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        let request_body = ChatRequest {
            model: config.model_id.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            stop: config.stop_sequences.clone(),
        };

        let url = format!("{}/chat/completions", self.config.api_url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::LlmProvider(format!(
                "Groq API request failed with status {}: {}",
                status, error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let (text, tokens_used) = parse_chat_response(&body)?;

        Ok(GenerationResult {
            text,
            model_id: config.model_id.clone(),
            tokens_used,
        })
    }
}

/// Extract the completion text and token usage from a chat-completion body
fn parse_chat_response(body: &str) -> Result<(String, Option<u32>)> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| Error::Serialization(e.to_string()))?;

    let text = parsed
        .choices
        .first()
        .map(|c| c.message.content.trim().to_string())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(Error::LlmProvider(
            "Empty completion from Groq API".to_string(),
        ));
    }

    Ok((text, parsed.usage.map(|u| u.total_tokens)))
}

#[async_trait]
impl LlmProvider for GroqClient {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult> {
        let config = GenerationConfig {
            model_id: self.current_model.clone(),
            ..Default::default()
        };
        self.generate_with_config(prompt, &config).await
    }

    async fn generate_with_config(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        let generation_future = self.perform_generation(prompt, config);

        match timeout(config.timeout, generation_future).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout("Groq request timed out".to_string())),
        }
    }

    fn model_id(&self) -> &str {
        &self.current_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_response() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "  Paris is the capital of France.  "}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20}
        }"#;

        let (text, tokens) = parse_chat_response(body).unwrap();
        assert_eq!(text, "Paris is the capital of France.");
        assert_eq!(tokens, Some(20));
    }

    #[test]
    fn test_parse_chat_response_without_usage() {
        let body = r#"{"choices": [{"message": {"content": "hello"}}]}"#;

        let (text, tokens) = parse_chat_response(body).unwrap();
        assert_eq!(text, "hello");
        assert_eq!(tokens, None);
    }

    #[test]
    fn test_parse_chat_response_empty_choices() {
        let body = r#"{"choices": []}"#;
        assert!(parse_chat_response(body).is_err());
    }

    #[test]
    fn test_parse_chat_response_garbage() {
        assert!(parse_chat_response("not json").is_err());
    }
}
