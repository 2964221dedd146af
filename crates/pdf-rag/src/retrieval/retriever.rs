//! Similarity retrieval over the vector index

use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::providers::{EmbeddingProvider, VectorIndexProvider, VectorSearchResult};

/// Embeds a query and returns the best-matching chunks above the score threshold
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexProvider>,
    config: RetrievalConfig,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            index,
            config,
        }
    }

    /// Retrieve up to `top_k` chunks with similarity >= `score_threshold`, best first.
    ///
    /// An empty index yields an empty result, not an error.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<VectorSearchResult>> {
        let embedding = self.embedder.embed(query).await?;
        let mut results = self
            .index
            .query(&embedding, self.config.top_k, self.config.score_threshold)
            .await?;

        // Bounds hold for any index implementation
        results.retain(|r| r.similarity >= self.config.score_threshold);
        results.truncate(self.config.top_k);

        tracing::debug!(
            "Retrieved {} chunks (top_k={}, threshold={})",
            results.len(),
            self.config.top_k,
            self.config.score_threshold
        );

        Ok(results)
    }
}
