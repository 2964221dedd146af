//! pdf-rag: question answering over uploaded PDFs
//!
//! PDFs are split into overlapping character windows, embedded through Ollama and
//! stored in a SQLite-backed vector index. Questions are rewritten against the
//! conversation so far, matched against the index, and answered by a locally
//! hosted model with the retrieved passages as context.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use generation::QueryPipeline;
pub use ingestion::{IngestOutcome, IngestPipeline};
pub use types::{
    conversation::Conversation,
    document::{Chunk, ChunkSource, Document},
    response::{AskResponse, QueryResult, SourceRef},
};
