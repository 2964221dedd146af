//! Local filesystem document store

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::types::document::{sanitize_filename, Document};

use super::document_store::DocumentStoreProvider;

/// Keeps uploaded documents under a single directory, one file per name.
/// Uploading the same name again overwrites the previous copy.
pub struct LocalDocumentStore {
    /// Directory to store documents
    storage_dir: PathBuf,
}

impl LocalDocumentStore {
    /// Create a new local document store. The directory is created on first write.
    pub fn new(storage_dir: PathBuf) -> Self {
        Self { storage_dir }
    }

    /// Get path for a document
    fn doc_path(&self, filename: &str) -> PathBuf {
        self.storage_dir.join(sanitize_filename(filename))
    }
}

#[async_trait]
impl DocumentStoreProvider for LocalDocumentStore {
    async fn store_document(&self, document: &Document) -> Result<String> {
        let doc_path = self.doc_path(&document.filename);
        let stored = doc_path.to_string_lossy().to_string();

        tokio::fs::create_dir_all(&self.storage_dir)
            .await
            .map_err(|e| Error::persistence(self.storage_dir.to_string_lossy(), e.to_string()))?;

        tokio::fs::write(&doc_path, &document.data)
            .await
            .map_err(|e| Error::persistence(&stored, e.to_string()))?;

        tracing::debug!(
            "Stored {} ({} bytes, sha256 {})",
            stored,
            document.size(),
            document.content_hash
        );

        Ok(stored)
    }

    fn name(&self) -> &str {
        "local-filesystem"
    }
}
