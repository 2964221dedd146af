//! Document and chunk types with source tracking for citations

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// An uploaded document
#[derive(Debug, Clone)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Base filename as uploaded
    pub filename: String,
    /// Raw file content
    pub data: Vec<u8>,
    /// SHA-256 of the raw content (hex)
    pub content_hash: String,
    /// Upload timestamp
    pub received_at: chrono::DateTime<chrono::Utc>,
}

impl Document {
    /// Create a document from an uploaded name and its bytes.
    ///
    /// Directory components are stripped from the name so the document can
    /// never be written outside the upload directory.
    pub fn new(filename: &str, data: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: sanitize_filename(filename),
            content_hash: hash_bytes(&data),
            data,
            received_at: chrono::Utc::now(),
        }
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Text of a single page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Text content of the page
    pub content: String,
}

/// Where a chunk came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkSource {
    /// Stored document path, used as the citation identifier
    pub source: String,
    /// Original filename
    pub filename: String,
    /// Page number (1-indexed)
    pub page_number: Option<u32>,
    /// Character offset of the chunk start within its page
    pub char_start: usize,
    /// Character offset one past the chunk end within its page
    pub char_end: usize,
    /// Position of the chunk within the document
    pub chunk_index: u32,
}

/// A window of document text, the unit of embedding and retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Parent document ID
    pub document_id: Uuid,
    /// Text content
    pub content: String,
    /// Source information
    pub source: ChunkSource,
    /// Embedding (empty until computed)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Vec<f32>,
}

impl Chunk {
    /// Create a chunk without an embedding
    pub fn new(document_id: Uuid, content: String, source: ChunkSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            content,
            source,
            embedding: Vec::new(),
        }
    }
}

/// Reduce a client-supplied name to its final path component
pub fn sanitize_filename(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim();

    if base.is_empty() || base == "." || base == ".." {
        "upload.pdf".to_string()
    } else {
        base.to_string()
    }
}

/// Hash raw bytes for auditing
fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\docs\\guide.pdf"), "guide.pdf");
        assert_eq!(sanitize_filename("dir/"), "upload.pdf");
        assert_eq!(sanitize_filename(".."), "upload.pdf");
    }

    #[test]
    fn test_document_hash() {
        let doc = Document::new("dir/Manual.PDF", b"abc".to_vec());
        assert_eq!(doc.filename, "Manual.PDF");
        assert_eq!(
            doc.content_hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(doc.size(), 3);
    }
}
