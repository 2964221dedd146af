//! SQLite-backed vector index
//!
//! The index owns one directory. The database file inside it is created on the
//! first `add` and the whole directory is removed by `destroy`. Queries scan
//! every stored embedding and rank by cosine similarity; the corpus sizes this
//! service handles do not need an ANN structure.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::providers::vector_index::{VectorIndexProvider, VectorSearchResult};
use crate::types::{Chunk, ChunkSource};

const DB_FILE: &str = "index.sqlite3";

/// Vector index stored in `<dir>/index.sqlite3`
pub struct SqliteVectorIndex {
    inner: Arc<IndexInner>,
}

struct IndexInner {
    dir: PathBuf,
    conn: Mutex<Option<Connection>>,
}

impl SqliteVectorIndex {
    /// Create an index rooted at `dir`. Nothing touches the disk until the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(IndexInner {
                dir: dir.into(),
                conn: Mutex::new(None),
            }),
        }
    }

    /// Run blocking SQLite work off the async executor
    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&IndexInner) -> Result<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || f(&inner))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
    }
}

impl IndexInner {
    fn db_path(&self) -> PathBuf {
        self.dir.join(DB_FILE)
    }

    /// Open the database if it exists on disk. Returns `false` when there is no index yet.
    fn open_existing(&self, slot: &mut Option<Connection>) -> Result<bool> {
        if slot.is_some() {
            // The directory may have been removed behind our back
            if self.db_path().exists() {
                return Ok(true);
            }
            *slot = None;
        }

        if !self.db_path().exists() {
            return Ok(false);
        }

        let conn = Connection::open(self.db_path())?;
        migrate(&conn)?;
        *slot = Some(conn);
        Ok(true)
    }

    /// Open the database, creating the directory and schema if needed
    fn open_or_create<'a>(&self, slot: &'a mut Option<Connection>) -> Result<&'a mut Connection> {
        if !self.open_existing(slot)? {
            std::fs::create_dir_all(&self.dir).map_err(|e| {
                Error::index(format!("Failed to create {}: {}", self.dir.display(), e))
            })?;
            let conn = Connection::open(self.db_path())?;
            migrate(&conn)?;
            tracing::info!("Created vector index at {}", self.db_path().display());
            *slot = Some(conn);
        }

        slot.as_mut()
            .ok_or_else(|| Error::internal("index connection missing after open"))
    }
}

/// Create tables
fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=NORMAL;

        CREATE TABLE IF NOT EXISTS entries (
            id TEXT PRIMARY KEY,
            document_id TEXT NOT NULL,
            chunk_index INTEGER NOT NULL,
            content TEXT NOT NULL,
            source TEXT NOT NULL,
            filename TEXT NOT NULL,
            page_number INTEGER,
            char_start INTEGER NOT NULL,
            char_end INTEGER NOT NULL,
            embedding BLOB NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_entries_document_id ON entries(document_id);

        CREATE TABLE IF NOT EXISTS index_meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

#[async_trait]
impl VectorIndexProvider for SqliteVectorIndex {
    async fn add(&self, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let chunks = chunks.to_vec();
        self.blocking(move |inner| {
            let mut slot = inner.conn.lock();
            let conn = inner.open_or_create(&mut slot)?;
            insert_all(conn, &chunks)
        })
        .await
    }

    async fn query(
        &self,
        embedding: &[f32],
        k: usize,
        min_score: f32,
    ) -> Result<Vec<VectorSearchResult>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query = embedding.to_vec();
        self.blocking(move |inner| {
            let mut slot = inner.conn.lock();
            if !inner.open_existing(&mut slot)? {
                return Ok(Vec::new());
            }
            let conn = slot
                .as_ref()
                .ok_or_else(|| Error::internal("index connection missing after open"))?;
            scan(conn, &query, k, min_score)
        })
        .await
    }

    async fn persist(&self) -> Result<()> {
        self.blocking(|inner| {
            let mut slot = inner.conn.lock();
            if inner.open_existing(&mut slot)? {
                if let Some(conn) = slot.as_ref() {
                    conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
                }
            }
            Ok(())
        })
        .await
    }

    async fn destroy(&self) -> Result<()> {
        self.blocking(|inner| {
            let mut slot = inner.conn.lock();
            // Close before deleting the files underneath
            slot.take();

            match std::fs::remove_dir_all(&inner.dir) {
                Ok(()) => {
                    tracing::info!("Removed vector index at {}", inner.dir.display());
                    Ok(())
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(Error::index(format!(
                    "Failed to remove {}: {}",
                    inner.dir.display(),
                    e
                ))),
            }
        })
        .await
    }

    async fn len(&self) -> Result<usize> {
        self.blocking(|inner| {
            let mut slot = inner.conn.lock();
            if !inner.open_existing(&mut slot)? {
                return Ok(0);
            }
            let conn = slot
                .as_ref()
                .ok_or_else(|| Error::internal("index connection missing after open"))?;
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
            Ok(count as usize)
        })
        .await
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}

/// Insert every chunk in one transaction, enforcing a single embedding dimension
fn insert_all(conn: &mut Connection, chunks: &[Chunk]) -> Result<()> {
    let tx = conn.transaction()?;

    let stored_dims: Option<String> = tx
        .query_row(
            "SELECT value FROM index_meta WHERE key = 'dimensions'",
            [],
            |row| row.get(0),
        )
        .optional()?;
    let mut dims = stored_dims.and_then(|d| d.parse::<usize>().ok());

    {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO entries (
                id, document_id, chunk_index, content, source, filename,
                page_number, char_start, char_end, embedding, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )?;

        let now = Utc::now().to_rfc3339();
        for chunk in chunks {
            if chunk.embedding.is_empty() {
                return Err(Error::index(format!("Chunk {} has no embedding", chunk.id)));
            }
            match dims {
                Some(d) if d != chunk.embedding.len() => {
                    return Err(Error::index(format!(
                        "Embedding dimension mismatch: index holds {}, chunk {} has {}",
                        d,
                        chunk.id,
                        chunk.embedding.len()
                    )));
                }
                Some(_) => {}
                None => dims = Some(chunk.embedding.len()),
            }

            stmt.execute(params![
                chunk.id.to_string(),
                chunk.document_id.to_string(),
                chunk.source.chunk_index as i64,
                chunk.content,
                chunk.source.source,
                chunk.source.filename,
                chunk.source.page_number.map(|p| p as i64),
                chunk.source.char_start as i64,
                chunk.source.char_end as i64,
                encode_embedding(&chunk.embedding),
                &now,
            ])?;
        }
    }

    if let Some(d) = dims {
        tx.execute(
            "INSERT OR REPLACE INTO index_meta (key, value) VALUES ('dimensions', ?1)",
            params![d.to_string()],
        )?;
    }

    // Dropping an uncommitted transaction rolls it back, so an early return
    // above leaves no entries from this batch behind.
    tx.commit()?;
    tracing::debug!("Indexed {} entries", chunks.len());
    Ok(())
}

/// Brute-force cosine scan
fn scan(conn: &Connection, query: &[f32], k: usize, min_score: f32) -> Result<Vec<VectorSearchResult>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, document_id, chunk_index, content, source, filename,
               page_number, char_start, char_end, embedding
        FROM entries
        "#,
    )?;

    let rows = stmt.query_map([], |row| {
        let id: String = row.get(0)?;
        let document_id: String = row.get(1)?;
        let chunk_index: i64 = row.get(2)?;
        let content: String = row.get(3)?;
        let source: String = row.get(4)?;
        let filename: String = row.get(5)?;
        let page_number: Option<i64> = row.get(6)?;
        let char_start: i64 = row.get(7)?;
        let char_end: i64 = row.get(8)?;
        let embedding: Vec<u8> = row.get(9)?;

        Ok((
            Chunk {
                id: parse_uuid(0, &id)?,
                document_id: parse_uuid(1, &document_id)?,
                content,
                source: ChunkSource {
                    source,
                    filename,
                    page_number: page_number.map(|p| p as u32),
                    char_start: char_start as usize,
                    char_end: char_end as usize,
                    chunk_index: chunk_index as u32,
                },
                embedding: Vec::new(),
            },
            decode_embedding(&embedding),
        ))
    })?;

    let mut results = Vec::new();
    for row in rows {
        let (chunk, embedding) = row?;
        if embedding.len() != query.len() {
            tracing::warn!(
                "Skipping entry {} with dimension {} (query has {})",
                chunk.id,
                embedding.len(),
                query.len()
            );
            continue;
        }

        let similarity = cosine_similarity(query, &embedding).clamp(0.0, 1.0);
        if similarity >= min_score {
            results.push(VectorSearchResult { chunk, similarity });
        }
    }

    results.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(k);

    Ok(results)
}

/// Parse a stored UUID column; a malformed value fails the whole query
fn parse_uuid(column: usize, value: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Cosine similarity; 0.0 if either vector has zero magnitude
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn decode_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}
