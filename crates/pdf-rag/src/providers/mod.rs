//! Provider abstractions for embeddings, LLM, vector index, and document storage
//!
//! The pipelines only see these traits; the Ollama, SQLite and filesystem
//! implementations are wired together in the server state.

pub mod document_store;
pub mod embedding;
pub mod llm;
pub mod local;
pub mod ollama;
pub mod vector_index;

#[cfg(test)]
pub(crate) mod testing;

pub use document_store::DocumentStoreProvider;
pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use vector_index::{VectorIndexProvider, VectorSearchResult};
