//! Vector index provider trait for storing and searching embeddings

use async_trait::async_trait;
use crate::error::Result;
use crate::types::Chunk;

/// Search result from the vector index
#[derive(Debug, Clone)]
pub struct VectorSearchResult {
    /// The matched chunk (without its embedding)
    pub chunk: Chunk,
    /// Similarity score (0.0 to 1.0, higher is more similar)
    pub similarity: f32,
}

/// Trait for vector storage and similarity search
///
/// Implementations:
/// - `SqliteVectorIndex`: SQLite file in a dedicated directory, cosine scan
#[async_trait]
pub trait VectorIndexProvider: Send + Sync {
    /// Add embedded chunks. Either every chunk is stored or none is.
    async fn add(&self, chunks: &[Chunk]) -> Result<()>;

    /// Up to `k` entries with similarity >= `min_score`, best first.
    ///
    /// An index that has never been written to returns no results.
    async fn query(
        &self,
        embedding: &[f32],
        k: usize,
        min_score: f32,
    ) -> Result<Vec<VectorSearchResult>>;

    /// Flush pending writes to durable storage
    async fn persist(&self) -> Result<()>;

    /// Irreversibly remove all persisted storage. Succeeds if nothing exists.
    async fn destroy(&self) -> Result<()>;

    /// Get total number of entries stored
    async fn len(&self) -> Result<usize>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
