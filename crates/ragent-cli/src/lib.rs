//! Terminal chat client for the ragent HTTP API

mod api;
mod render;
mod ui;

pub use api::{ApiClient, ChatReply, UploadReply};
pub use render::{render_answer, render_trace};
pub use ui::{display_banner, handle_input_with_history, print_help};

// Re-export core types
pub use ragent_core::{Error, Result};
