use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use ragent_cli::{
    display_banner, handle_input_with_history, print_help, render_answer, render_trace, ApiClient,
};
use ragent_core::{DocumentIndexer, VectorStore};
use ragent_rag::{ChunkIndexer, HfEmbedder, QdrantVectorStore};

mod server;

#[derive(Parser)]
#[command(name = "ragent")]
#[command(about = "Routed RAG chat agent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Address to bind
        #[arg(short, long, default_value = "127.0.0.1:8000")]
        bind: String,
    },
    /// Chat with a running server from the terminal
    Chat {
        /// Base URL of the backend
        #[arg(short, long, default_value = "http://localhost:8000")]
        server: String,
    },
    /// Index a document without going through HTTP
    Ingest {
        /// Path to a PDF or text file, or an http(s) URL
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind } => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .init();
            server::run(&bind).await
        }
        Commands::Chat { server } => run_chat(&server).await,
        Commands::Ingest { path } => run_ingest(&path).await,
    }
}

async fn run_chat(server: &str) -> Result<()> {
    let client = ApiClient::new(server)?;

    display_banner();

    match client.health().await {
        Ok(health) => {
            if let Some(count) = health.get("documents_indexed").and_then(|v| v.as_u64()) {
                println!("{} Connected. {} chunks indexed.", "✅".green(), count);
            } else {
                println!("{} Connected.", "✅".green());
            }
        }
        Err(e) => {
            println!(
                "{} Could not reach the backend at {}: {}",
                "⚠️".yellow(),
                server,
                e
            );
        }
    }

    let session_id = Uuid::new_v4().to_string();
    let mut web_enabled = true;
    let mut history = Vec::new();

    println!("{}", "Hello! How can I help you today?".cyan());
    println!();

    loop {
        let input = handle_input_with_history(&mut history).await?;

        if input.is_empty() {
            continue;
        }

        let input_lower = input.to_lowercase();

        if input_lower == "exit" || input_lower == "quit" {
            println!("{}", "👋 Goodbye!".green());
            break;
        }

        if input_lower == "help" {
            print_help();
            continue;
        }

        if input_lower == "web on" {
            web_enabled = true;
            println!("{} Web-search fallback enabled", "🌐".cyan());
            continue;
        }

        if input_lower == "web off" {
            web_enabled = false;
            println!("{} Web-search fallback disabled", "🌐".cyan());
            continue;
        }

        if let Some(path) = input.strip_prefix("upload ") {
            let path = path.trim();
            println!("{} Uploading {}...", "📄".blue(), path);
            match client.upload_document(path).await {
                Ok(result) => {
                    println!(
                        "{} '{}' indexed as {} chunks",
                        "✅".green(),
                        result.filename,
                        result.processed_chunks
                    );
                }
                Err(e) => println!("{} Upload failed: {}", "❌".red(), e),
            }
            continue;
        }

        println!("{} Thinking...", "🤖".blue());

        match client.chat(&session_id, &input, web_enabled).await {
            Ok(reply) => {
                render_answer(&reply.response);
                render_trace(&reply.trace_events);
            }
            Err(e) => {
                println!("{} Turn failed: {}", "❌".red(), e);
            }
        }
    }

    Ok(())
}

async fn run_ingest(path: &str) -> Result<()> {
    let embedder = Arc::new(HfEmbedder::from_env()?);

    let mut vector_store = QdrantVectorStore::from_env()?;
    vector_store.connect().await?;
    let vector_store = Arc::new(vector_store);

    let indexer = ChunkIndexer::new(vector_store.clone(), embedder);

    println!("{} Indexing {}...", "📄".blue(), path);
    let result = if path.starts_with("http://") || path.starts_with("https://") {
        indexer.index_url(path).await?
    } else {
        indexer.index_file(path).await?
    };

    let total = vector_store.count().await?;
    println!(
        "{} '{}' indexed as {} chunks ({} total in collection)",
        "✅".green(),
        result.source,
        result.chunks_indexed,
        total
    );

    Ok(())
}
