//! Response types for the service boundary

use serde::{Deserialize, Serialize};

use super::conversation::Turn;
use crate::providers::vector_index::VectorSearchResult;

/// Answer from the query pipeline together with the entries it was grounded on
#[derive(Debug, Clone)]
pub struct QueryResult {
    /// Model answer
    pub answer: String,
    /// Standalone query used for retrieval
    pub search_query: String,
    /// Retrieved entries in ranking order
    pub context: Vec<VectorSearchResult>,
}

impl QueryResult {
    /// Citations for the retrieved entries
    pub fn sources(&self) -> Vec<SourceRef> {
        self.context.iter().map(SourceRef::from).collect()
    }
}

/// A cited source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Stored document path
    pub source: String,
    /// Chunk text used as context
    pub page_content: String,
    /// Page the chunk came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Similarity score (0.0-1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl From<&VectorSearchResult> for SourceRef {
    fn from(result: &VectorSearchResult) -> Self {
        Self {
            source: result.chunk.source.source.clone(),
            page_content: result.chunk.content.clone(),
            page: result.chunk.source.page_number,
            score: Some(result.similarity),
        }
    }
}

/// Direct chat response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}

/// Grounded question response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub sources: Vec<SourceRef>,
}

impl From<QueryResult> for AskResponse {
    fn from(result: QueryResult) -> Self {
        let sources = result.sources();
        Self {
            answer: result.answer,
            sources,
        }
    }
}

/// Document upload response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    pub filename: String,
    /// Number of pages extracted
    pub doc_len: usize,
    /// Number of chunks indexed
    pub chunks: usize,
}

/// Generic status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

/// Conversation history for a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub session: String,
    pub turns: Vec<Turn>,
}
