//! HTTP routes for the RAG server

pub mod ask;
pub mod chat;
pub mod ingest;
pub mod reset;

use axum::{
    extract::{DefaultBodyLimit, State},
    response::Html,
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;

const INDEX_HTML: &str = include_str!("../../../static/index.html");

/// Build all service routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Browser UI
        .route("/", get(ui))
        // Ungrounded chat
        .route("/ai", post(chat::chat))
        // Grounded question answering
        .route("/ask_pdf", post(ask::ask_pdf))
        // Upload - with larger body limit for PDFs
        .route(
            "/pdf",
            post(ingest::upload_pdf).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Reset
        .route("/clear", get(reset::clear))
        .route("/clear/history", post(reset::clear_history))
        .route("/clear/index", post(reset::clear_index))
        .route("/history", get(reset::history))
        // Info
        .route("/info", get(info))
}

/// Embedded single-page UI
async fn ui() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Service info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = state.config();
    Json(serde_json::json!({
        "name": "pdf-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Question answering over uploaded PDFs with conversation-aware retrieval",
        "models": {
            "llm": state.llm().model(),
            "embedding": config.llm.embed_model,
        },
        "retrieval": {
            "top_k": config.retrieval.top_k,
            "score_threshold": config.retrieval.score_threshold,
        },
        "chunking": {
            "chunk_size": config.chunking.chunk_size,
            "chunk_overlap": config.chunking.chunk_overlap,
        },
        "endpoints": {
            "POST /ai?query=": "Chat with the model directly",
            "POST /ask_pdf?query=&session=": "Ask a question about the uploaded PDFs",
            "POST /pdf": "Upload a PDF (multipart field 'file')",
            "GET /clear": "Delete the index and clear every chat history",
            "POST /clear/history?session=": "Clear chat history only",
            "POST /clear/index": "Delete the index only",
            "GET /history?session=": "Show chat history",
            "GET /health": "Liveness check",
            "GET /ready": "Readiness check"
        }
    }))
}
