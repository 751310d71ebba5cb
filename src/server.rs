//! HTTP API layer: chat, document upload, health

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use ragent_agent::Agent;
use ragent_core::{DocumentIndexer, Error, TraceEvent, VectorStore};
use ragent_groq::GroqClient;
use ragent_rag::{extract_pdf_text, ChunkIndexer, HfEmbedder, QdrantVectorStore, Retriever};
use ragent_tavily::TavilyClient;

type LiveAgent = Agent<GroqClient, Retriever<QdrantVectorStore, HfEmbedder>, TavilyClient>;
type LiveIndexer = ChunkIndexer<QdrantVectorStore, HfEmbedder>;

#[derive(Clone)]
struct AppState {
    agent: Arc<LiveAgent>,
    indexer: Arc<LiveIndexer>,
    vector_store: Arc<QdrantVectorStore>,
}

#[derive(Deserialize)]
struct ChatRequest {
    session_id: String,
    query: String,
    #[serde(default = "default_true")]
    enable_web_search: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Serialize)]
struct ChatResponse {
    response: String,
    trace_events: Vec<TraceEvent>,
}

#[derive(Serialize)]
struct UploadResponse {
    message: String,
    filename: String,
    processed_chunks: usize,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    documents_indexed: Option<usize>,
    web_search_available: bool,
}

fn error_status(error: &Error) -> StatusCode {
    match error {
        Error::Ingestion(_) => StatusCode::BAD_REQUEST,
        Error::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_GATEWAY,
    }
}

async fn handle_chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    tracing::info!(session_id = %payload.session_id, query = %payload.query, "chat request");

    let reply = state
        .agent
        .handle_query(&payload.session_id, &payload.query, payload.enable_web_search)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "chat turn failed");
            (error_status(&e), e.to_string())
        })?;

    Ok(Json(ChatResponse {
        response: reply.response,
        trace_events: reply.trace_events,
    }))
}

async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, String)> {
    let mut filename = None;
    let mut bytes = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    {
        if field.name() == Some("file") {
            filename = field.file_name().map(|n| n.to_string());
            bytes = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?,
            );
        }
    }

    let filename = filename.unwrap_or_else(|| "upload.pdf".to_string());
    let bytes =
        bytes.ok_or_else(|| (StatusCode::BAD_REQUEST, "Missing 'file' field".to_string()))?;

    if !filename.to_lowercase().ends_with(".pdf") {
        return Err((
            StatusCode::BAD_REQUEST,
            "Only PDF uploads are supported".to_string(),
        ));
    }

    tracing::info!(filename = %filename, size = bytes.len(), "document upload");

    let text = extract_pdf_text(&bytes).map_err(|e| (error_status(&e), e.to_string()))?;

    let result = state
        .indexer
        .index_text(&text, &filename)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, filename = %filename, "ingestion failed");
            (error_status(&e), e.to_string())
        })?;

    tracing::info!(
        filename = %filename,
        chunks = result.chunks_indexed,
        "document indexed"
    );

    Ok(Json(UploadResponse {
        message: "Document processed and indexed".to_string(),
        filename,
        processed_chunks: result.chunks_indexed,
    }))
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let documents_indexed = state.vector_store.count().await.ok();

    Json(HealthResponse {
        status: "ok",
        documents_indexed,
        web_search_available: state.agent.has_web_search(),
    })
}

fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/chat/", post(handle_chat))
        .route("/upload-document/", post(handle_upload))
        .layer(DefaultBodyLimit::max(32 * 1024 * 1024))
        .layer(cors)
        .with_state(state)
}

/// Build all backing clients from the environment and serve the API
pub async fn run(bind: &str) -> anyhow::Result<()> {
    let llm = GroqClient::from_env()?;
    if let Err(e) = llm.health_check().await {
        tracing::warn!(error = %e, "Groq health check failed; chat turns may error");
    }

    let embedder = Arc::new(HfEmbedder::from_env()?);

    let mut vector_store = QdrantVectorStore::from_env()?;
    vector_store.connect().await?;
    let vector_store = Arc::new(vector_store);

    let web_search = match TavilyClient::from_env() {
        Ok(client) => Some(client),
        Err(_) => {
            tracing::warn!("TAVILY_API_KEY not set; web-search fallback disabled");
            None
        }
    };

    let retriever = Retriever::new(vector_store.clone(), embedder.clone());
    let agent = Arc::new(Agent::new(llm, retriever, web_search));
    let indexer = Arc::new(ChunkIndexer::new(vector_store.clone(), embedder));

    let state = AppState {
        agent,
        indexer,
        vector_store,
    };

    let app = build_app(state);

    tracing::info!("ragent API listening on http://{}", bind);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
