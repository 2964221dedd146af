//! Application state for the RAG server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::{OllamaClient, QueryPipeline};
use crate::ingestion::{IngestPipeline, TextChunker};
use crate::providers::{
    local::LocalDocumentStore,
    ollama::{OllamaEmbedder, OllamaLlm},
    DocumentStoreProvider, EmbeddingProvider, LlmProvider, VectorIndexProvider,
};
use crate::retrieval::{Retriever, SqliteVectorIndex};

use super::sessions::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Embedding provider
    embedder: Arc<dyn EmbeddingProvider>,
    /// LLM provider
    llm: Arc<dyn LlmProvider>,
    /// Vector index shared by ingestion and retrieval
    index: Arc<dyn VectorIndexProvider>,
    ingest: IngestPipeline,
    query: QueryPipeline,
    /// Conversation histories
    sessions: SessionStore,
}

impl AppState {
    /// Create state backed by Ollama, the SQLite index and the local upload directory
    pub async fn new(config: RagConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!("Initializing RAG application state...");

        let ollama = Arc::new(OllamaClient::new(&config.llm)?);
        let embedder = Arc::new(OllamaEmbedder::from_client(Arc::clone(&ollama)));
        let llm = Arc::new(OllamaLlm::from_client(ollama));
        tracing::info!(
            "Ollama client initialized (embed: {}, generate: {})",
            config.llm.embed_model,
            config.llm.generate_model
        );

        let index = Arc::new(SqliteVectorIndex::new(&config.storage.index_dir));
        tracing::info!("Vector index at {}", config.storage.index_dir.display());

        let document_store = Arc::new(LocalDocumentStore::new(config.storage.upload_dir.clone()));

        Self::from_providers(config, embedder, llm, index, document_store)
    }

    /// Wire pipelines around existing providers
    pub fn from_providers(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        index: Arc<dyn VectorIndexProvider>,
        document_store: Arc<dyn DocumentStoreProvider>,
    ) -> Result<Self> {
        tracing::info!(
            "Providers: embedding={}, llm={} ({}), index={}, documents={}",
            embedder.name(),
            llm.name(),
            llm.model(),
            index.name(),
            document_store.name()
        );

        let ingest = IngestPipeline::new(
            document_store,
            Arc::clone(&embedder),
            Arc::clone(&index),
            TextChunker::from_config(&config.chunking)?,
        );
        let retriever = Retriever::new(
            Arc::clone(&embedder),
            Arc::clone(&index),
            config.retrieval.clone(),
        );
        let query = QueryPipeline::new(Arc::clone(&llm), retriever);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                embedder,
                llm,
                index,
                ingest,
                query,
                sessions: SessionStore::new(),
            }),
        })
    }

    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.inner.llm
    }

    pub fn index(&self) -> &Arc<dyn VectorIndexProvider> {
        &self.inner.index
    }

    pub fn ingest(&self) -> &IngestPipeline {
        &self.inner.ingest
    }

    pub fn query(&self) -> &QueryPipeline {
        &self.inner.query
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Ready when both the embedding and generation backends answer
    pub async fn is_ready(&self) -> bool {
        let embedder = self.inner.embedder.health_check().await;
        let llm = self.inner.llm.health_check().await;
        matches!((embedder, llm), (Ok(true), Ok(true)))
    }

    /// Forget a session's history
    pub fn clear_history(&self, session: &str) -> usize {
        let dropped = self.inner.sessions.clear(session);
        tracing::info!("Cleared {} turns from session '{}'", dropped, session);
        dropped
    }

    /// Delete the persisted index
    pub async fn clear_index(&self) -> Result<()> {
        self.inner.index.destroy().await?;
        tracing::info!("Vector index destroyed");
        Ok(())
    }

    /// Delete the index, then forget every session's history.
    ///
    /// History is left untouched when the index cannot be removed.
    pub async fn reset(&self) -> Result<()> {
        self.clear_index().await?;
        self.inner.sessions.clear_all();
        tracing::info!("Cleared all sessions");
        Ok(())
    }
}
