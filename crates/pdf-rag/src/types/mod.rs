//! Core types for the RAG service

pub mod conversation;
pub mod document;
pub mod query;
pub mod response;

pub use conversation::{Conversation, Role, Turn};
pub use document::{Chunk, ChunkSource, Document, PageContent};
pub use query::{QueryParams, SessionParams, DEFAULT_SESSION};
pub use response::{
    AskResponse, ChatResponse, HistoryResponse, QueryResult, SourceRef, StatusResponse,
    UploadResponse,
};
