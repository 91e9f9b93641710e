//! SQLite-based vector store implementation.
//!
//! Uses SQLite for persistence with cosine distance computed in Rust.

use super::{rank, EntryMetadata, IndexEntry, SearchHit, VectorStore};
use crate::error::{HuskError, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS entries (
        id TEXT PRIMARY KEY,
        text TEXT NOT NULL,
        recording_name TEXT NOT NULL,
        location TEXT NOT NULL,
        embedding BLOB NOT NULL,
        indexed_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_entries_recording ON entries(recording_name);
"#;

const UPSERT: &str = r#"
    INSERT OR REPLACE INTO entries
    (id, text, recording_name, location, embedding, indexed_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

const SELECT_ALL: &str = r#"
    SELECT id, text, recording_name, location, embedding
    FROM entries
    ORDER BY id
"#;

/// SQLite-based vector store.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Open (or create) a store at `path`.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite vector store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite vector store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| HuskError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<IndexEntry> {
        let embedding_bytes: Vec<u8> = row.get(4)?;
        Ok(IndexEntry {
            id: row.get(0)?,
            embedding: Self::bytes_to_embedding(&embedding_bytes),
            metadata: EntryMetadata {
                text: row.get(1)?,
                recording_name: row.get(2)?,
                location: row.get(3)?,
            },
        })
    }

    fn load_all(conn: &Connection) -> Result<Vec<IndexEntry>> {
        let mut stmt = conn.prepare(SELECT_ALL)?;
        let rows = stmt.query_map([], Self::row_to_entry)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn insert(conn: &Connection, entry: &IndexEntry, indexed_at: &str) -> Result<()> {
        conn.execute(
            UPSERT,
            params![
                entry.id,
                entry.metadata.text,
                entry.metadata.recording_name,
                entry.metadata.location,
                Self::embedding_to_bytes(&entry.embedding),
                indexed_at,
            ],
        )?;
        Ok(())
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, entry), fields(id = %entry.id))]
    async fn upsert(&self, entry: &IndexEntry) -> Result<()> {
        let conn = self.lock()?;
        Self::insert(&conn, entry, &Utc::now().to_rfc3339())?;
        debug!("Upserted entry {}", entry.id);
        Ok(())
    }

    #[instrument(skip(self, embedding))]
    async fn query(&self, embedding: &[f32], n_results: usize) -> Result<Vec<SearchHit>> {
        let conn = self.lock()?;
        let hits = rank(Self::load_all(&conn)?, embedding, n_results);
        debug!("Found {} matching entries", hits.len());
        Ok(hits)
    }

    async fn list_all(&self) -> Result<Vec<IndexEntry>> {
        let conn = self.lock()?;
        Self::load_all(&conn)
    }

    async fn count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    async fn clear(&self) -> Result<usize> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM entries", [])?;
        info!("Cleared {} entries", removed);
        Ok(removed)
    }
}
