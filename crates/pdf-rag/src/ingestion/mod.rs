//! Document ingestion pipeline for PDFs

pub mod chunker;
pub mod parser;
pub mod pipeline;

pub use chunker::{TextChunker, TextWindow};
pub use parser::PdfExtractor;
pub use pipeline::{IngestOutcome, IngestPipeline};
