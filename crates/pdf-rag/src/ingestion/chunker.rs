//! Text chunking with page and position tracking

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::{Chunk, ChunkSource, Document, PageContent};

/// A window over page text, offsets counted in characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextWindow {
    pub char_start: usize,
    pub char_end: usize,
    pub text: String,
}

/// Fixed-size character chunker with overlap
///
/// Windows never cross a page boundary. Each window holds at most `chunk_size`
/// characters and starts `chunk_size - overlap` characters after the previous one.
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Characters shared by consecutive chunks
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Config("chunk_size must be greater than 0".to_string()));
        }
        if overlap >= chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self { chunk_size, overlap })
    }

    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Chunk every page of a document. `source` is the citation identifier
    /// stored with each chunk (the stored document path).
    pub fn chunk_document(&self, doc: &Document, source: &str, pages: &[PageContent]) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for page in pages {
            if page.content.trim().is_empty() {
                tracing::debug!("{}: page {} has no text", doc.filename, page.page_number);
                continue;
            }

            for window in self.split(&page.content) {
                let source = ChunkSource {
                    source: source.to_string(),
                    filename: doc.filename.clone(),
                    page_number: Some(page.page_number),
                    char_start: window.char_start,
                    char_end: window.char_end,
                    chunk_index: chunks.len() as u32,
                };
                chunks.push(Chunk::new(doc.id, window.text, source));
            }
        }

        chunks
    }

    /// Split text into overlapping windows
    pub fn split(&self, text: &str) -> Vec<TextWindow> {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        let step = self.chunk_size - self.overlap;

        let mut windows = Vec::new();
        let mut start = 0usize;

        while start < len {
            let end = (start + self.chunk_size).min(len);
            windows.push(TextWindow {
                char_start: start,
                char_end: end,
                text: chars[start..end].iter().collect(),
            });

            if end == len {
                break;
            }
            start += step;
        }

        windows
    }
}
