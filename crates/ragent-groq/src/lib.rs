//! Groq integration for ragent
//!
//! This crate provides the Groq implementation of the LlmProvider trait.

mod client;
mod config;


pub use client::GroqClient;
pub use config::GroqConfig;

// Re-export core types for convenience
pub use ragent_core::{Error, GenerationConfig, GenerationResult, LlmProvider, Result};
