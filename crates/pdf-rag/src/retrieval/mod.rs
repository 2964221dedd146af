//! Vector index and similarity retrieval

pub mod retriever;
pub mod store;

pub use retriever::Retriever;
pub use store::{cosine_similarity, SqliteVectorIndex};
