//! Document ingestion: store, extract, chunk, embed, index

use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::providers::{DocumentStoreProvider, EmbeddingProvider, VectorIndexProvider};
use crate::types::Document;

use super::chunker::TextChunker;
use super::parser::PdfExtractor;

/// Result of ingesting one document
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub document_id: Uuid,
    pub filename: String,
    /// Where the raw bytes were written; also the citation source of every chunk
    pub stored_path: String,
    /// Number of pages in the PDF
    pub pages: usize,
    /// Number of chunks added to the index
    pub chunks: usize,
}

/// Turns uploaded PDFs into indexed chunks
pub struct IngestPipeline {
    document_store: Arc<dyn DocumentStoreProvider>,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexProvider>,
    chunker: TextChunker,
}

impl IngestPipeline {
    pub fn new(
        document_store: Arc<dyn DocumentStoreProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        chunker: TextChunker,
    ) -> Self {
        Self {
            document_store,
            embedder,
            index,
            chunker,
        }
    }

    /// Ingest a document.
    ///
    /// Every chunk is embedded before the index is touched and the entries are
    /// added in one batch, so a failure leaves no entries of this document behind.
    /// The raw file stays in the upload directory either way.
    pub async fn ingest(&self, document: &Document) -> Result<IngestOutcome> {
        if !PdfExtractor::accepts(&document.filename) {
            return Err(Error::UnsupportedFileType(format!(
                "{} - only PDF documents are accepted",
                document.filename
            )));
        }

        let stored_path = self.document_store.store_document(document).await?;

        let filename = document.filename.clone();
        let data = document.data.clone();
        let pages = tokio::task::spawn_blocking(move || PdfExtractor::extract(&filename, &data))
            .await
            .map_err(|e| {
                Error::extraction(&document.filename, format!("Extraction task failed: {}", e))
            })??;

        let mut chunks = self.chunker.chunk_document(document, &stored_path, &pages);
        if chunks.is_empty() {
            return Err(Error::extraction(&document.filename, "No text to index"));
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(Error::embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }
        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        self.index.add(&chunks).await?;
        self.index.persist().await?;

        tracing::info!(
            "Ingested {} ({} pages, {} chunks) into {} index",
            document.filename,
            pages.len(),
            chunks.len(),
            self.index.name()
        );

        Ok(IngestOutcome {
            document_id: document.id,
            filename: document.filename.clone(),
            stored_path,
            pages: pages.len(),
            chunks: chunks.len(),
        })
    }
}
