//! Document store provider trait for keeping raw uploads

use async_trait::async_trait;
use crate::error::Result;
use crate::types::Document;

/// Trait for raw document storage
///
/// Implementations:
/// - `LocalDocumentStore`: Local filesystem
#[async_trait]
pub trait DocumentStoreProvider: Send + Sync {
    /// Store a document's bytes
    ///
    /// Returns the storage path, which doubles as the citation source
    async fn store_document(&self, document: &Document) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
