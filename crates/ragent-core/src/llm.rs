//! LLM provider trait and types

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Configuration for a single generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stop_sequences: Vec<String>,
    #[serde(skip, default = "default_timeout")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_id: String::new(),
            max_tokens: 1024,
            temperature: 0.0,
            stop_sequences: Vec::new(),
            timeout: default_timeout(),
        }
    }
}

/// Result of a generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    pub model_id: String,
    pub tokens_used: Option<u32>,
}

/// Trait for hosted LLM chat-completion providers
///
/// Implementations wrap a remote endpoint. The agent graph treats the
/// provider as a nondeterministic oracle, so tests drive it through mock
/// implementations of this trait.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion with the provider's default configuration
    async fn generate(&self, prompt: &str) -> Result<GenerationResult>;

    /// Generate a completion with explicit configuration
    async fn generate_with_config(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GenerationResult>;

    /// The model currently used for generation
    fn model_id(&self) -> &str;
}
