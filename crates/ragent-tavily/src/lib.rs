//! Tavily integration for ragent
//!
//! This crate provides the Tavily implementation of the WebSearchProvider trait.

mod client;
mod config;

#[cfg(test)]
mod tests;

pub use client::TavilyClient;
pub use config::TavilyConfig;

// Re-export core types for convenience
pub use ragent_core::{Error, Result, WebSearchProvider, WebSnippet};
