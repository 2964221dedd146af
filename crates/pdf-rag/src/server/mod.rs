//! HTTP server for the RAG system

pub mod routes;
pub mod sessions;
pub mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::RagConfig;
use crate::error::{Error, Result};
use state::AppState;

/// RAG HTTP Server
pub struct RagServer {
    config: RagConfig,
    state: AppState,
}

impl RagServer {
    /// Create a new RAG server
    pub async fn new(config: RagConfig) -> Result<Self> {
        let state = AppState::new(config.clone()).await?;
        Ok(Self { config, state })
    }

    /// Create around prepared state
    pub fn with_state(config: RagConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let router = Router::new()
            // Health check
            .route("/health", get(health_check))
            .route("/ready", get(readiness))
            .merge(routes::api_routes(self.config.server.max_upload_size))
            .with_state(self.state.clone())
            // Middleware layers (applied bottom to top)
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new());

        if self.config.server.enable_cors {
            router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
        } else {
            router
        }
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.build_router();

        tracing::info!("Starting RAG server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint
async fn readiness(state: axum::extract::State<AppState>) -> axum::http::StatusCode {
    if state.is_ready().await {
        axum::http::StatusCode::OK
    } else {
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::parser::test_support::sample_pdf;
    use crate::providers::local::LocalDocumentStore;
    use crate::providers::testing::{ScriptedLlm, WordEmbedder};
    use crate::retrieval::SqliteVectorIndex;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    const FACT: &str = "The rated capacity of the pump is 500 units per hour.";
    const BOUNDARY: &str = "pdf-rag-test-boundary";

    struct TestServer {
        dir: tempfile::TempDir,
        llm: Arc<ScriptedLlm>,
        state: AppState,
        router: Router,
    }

    fn test_server() -> TestServer {
        let dir = tempfile::tempdir().unwrap();
        let index_dir = dir.path().join("db");
        build_server(dir, index_dir)
    }

    fn build_server(dir: tempfile::TempDir, index_dir: std::path::PathBuf) -> TestServer {
        let mut config = RagConfig::default();
        config.storage.index_dir = index_dir;
        config.storage.upload_dir = dir.path().join("pdf");

        let llm = Arc::new(ScriptedLlm::new());
        let state = AppState::from_providers(
            config.clone(),
            Arc::new(WordEmbedder::new()),
            llm.clone(),
            Arc::new(SqliteVectorIndex::new(&config.storage.index_dir)),
            Arc::new(LocalDocumentStore::new(config.storage.upload_dir.clone())),
        )
        .unwrap();
        let router = RagServer::with_state(config, state.clone()).build_router();

        TestServer {
            dir,
            llm,
            state,
            router,
        }
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    fn post(uri: &str) -> Request<Body> {
        Request::post(uri).body(Body::empty()).unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn upload(filename: &str, data: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::post("/pdf")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn encode(s: &str) -> String {
        s.replace(' ', "%20").replace('?', "%3F")
    }

    #[tokio::test]
    async fn test_health_and_ready() {
        let server = test_server();
        let (status, body) = send(&server.router, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String("OK".into()));

        let (status, _) = send(&server.router, get_req("/ready")).await;
        assert_eq!(status, StatusCode::OK);

        server.llm.set_healthy(false);
        let (status, _) = send(&server.router, get_req("/ready")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        // Liveness does not depend on the backends
        let (status, _) = send(&server.router, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ui_and_info() {
        let server = test_server();
        let response = server.router.clone().oneshot(get_req("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("/ask_pdf"));

        let (status, body) = send(&server.router, get_req("/info")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "pdf-rag");
        assert_eq!(body["retrieval"]["top_k"], 3);
    }

    #[tokio::test]
    async fn test_upload_then_ask_cites_source() {
        let server = test_server();

        let pdf = sample_pdf(&[FACT, "Store the pump in a dry place."]);
        let (status, body) = send(&server.router, upload("pump.pdf", &pdf)).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["status"], "Successfully Uploaded");
        assert_eq!(body["filename"], "pump.pdf");
        assert_eq!(body["doc_len"], 2);
        assert_eq!(body["chunks"], 2);
        assert!(server.dir.path().join("pdf").join("pump.pdf").exists());

        server.llm.push_reply("500 units per hour.");
        let uri = format!("/ask_pdf?query={}", encode(FACT));
        let (status, body) = send(&server.router, post(&uri)).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["answer"], "500 units per hour.");

        let sources = body["sources"].as_array().unwrap();
        assert!(!sources.is_empty() && sources.len() <= 3);
        assert!(sources[0]["page_content"].as_str().unwrap().contains(FACT));
        assert!(sources[0]["source"].as_str().unwrap().ends_with("pump.pdf"));

        let (_, history) = send(&server.router, get_req("/history")).await;
        assert_eq!(history["session"], "default");
        assert_eq!(history["turns"].as_array().unwrap().len(), 2);
        assert_eq!(history["turns"][0]["role"], "human");
        assert_eq!(history["turns"][1]["role"], "assistant");
    }

    #[tokio::test]
    async fn test_clear_resets_history_and_index() {
        let server = test_server();
        let pdf = sample_pdf(&[FACT]);
        send(&server.router, upload("pump.pdf", &pdf)).await;
        send(&server.router, post(&format!("/ask_pdf?query={}", encode(FACT)))).await;
        assert!(server.dir.path().join("db").exists());

        let (status, body) = send(&server.router, get_req("/clear")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Chat history cleared.");
        assert!(!server.dir.path().join("db").exists());

        let (_, history) = send(&server.router, get_req("/history")).await;
        assert!(history["turns"].as_array().unwrap().is_empty());

        let (status, body) =
            send(&server.router, post(&format!("/ask_pdf?query={}", encode(FACT)))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["sources"].as_array().unwrap().is_empty());

        // Idempotent
        let (status, _) = send(&server.router, get_req("/clear")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_clear_forgets_every_session() {
        let server = test_server();
        server.state.sessions().record_exchange("default", "q1", "a1");
        server.state.sessions().record_exchange("bob", "q2", "a2");

        let (status, _) = send(&server.router, get_req("/clear")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(server.state.sessions().snapshot("default").is_empty());
        assert!(server.state.sessions().snapshot("bob").is_empty());

        let (_, history) = send(&server.router, get_req("/history?session=bob")).await;
        assert!(history["turns"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_keeps_history_when_index_removal_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the index directory should be
        let index_dir = dir.path().join("db");
        std::fs::write(&index_dir, b"not a directory").unwrap();
        let server = build_server(dir, index_dir.clone());
        server.state.sessions().record_exchange("default", "q", "a");

        let (status, body) = send(&server.router, get_req("/clear")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["type"], "index_error");
        assert_eq!(server.state.sessions().snapshot("default").len(), 2);
        assert!(index_dir.is_file());
    }

    #[tokio::test]
    async fn test_clear_on_fresh_system() {
        let server = test_server();
        let (status, body) = send(&server.router, get_req("/clear")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Chat history cleared.");
    }

    #[tokio::test]
    async fn test_split_resets() {
        let server = test_server();
        send(&server.router, upload("pump.pdf", &sample_pdf(&[FACT]))).await;
        send(&server.router, post("/ask_pdf?query=capacity&session=alice")).await;
        send(&server.router, post("/ask_pdf?query=capacity&session=bob")).await;

        let (status, _) = send(&server.router, post("/clear/history?session=alice")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(server.state.sessions().snapshot("alice").is_empty());
        assert_eq!(server.state.sessions().snapshot("bob").len(), 2);
        assert_eq!(server.state.index().len().await.unwrap(), 1);

        let (status, _) = send(&server.router, post("/clear/index")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(server.state.index().len().await.unwrap(), 0);
        assert_eq!(server.state.sessions().snapshot("bob").len(), 2);
    }

    #[tokio::test]
    async fn test_direct_chat_leaves_history_alone() {
        let server = test_server();
        server.llm.push_reply("4");

        let (status, body) = send(&server.router, post("/ai?query=What%20is%202%2B2%3F")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "4");
        assert!(body.get("sources").is_none());
        assert_eq!(server.llm.prompts(), vec!["What is 2+2?".to_string()]);
        assert!(server.state.sessions().snapshot("default").is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_is_503_and_history_unchanged() {
        let server = test_server();
        server.llm.push_failure();

        let (status, body) = send(&server.router, post("/ask_pdf?query=capacity")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["type"], "model_error");
        assert!(server.state.sessions().snapshot("default").is_empty());
    }

    #[tokio::test]
    async fn test_bad_requests() {
        let server = test_server();

        let (status, body) = send(&server.router, post("/ask_pdf")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "bad_request");

        let (status, body) = send(&server.router, upload("notes.txt", b"hello")).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"]["type"], "unsupported_type");

        let (status, body) = send(&server.router, upload("broken.pdf", b"not a pdf")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "extraction_error");
    }
}
