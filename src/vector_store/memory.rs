//! In-memory vector store implementation.
//!
//! Useful for testing and for serving a corpus indexed at startup.

use super::{rank, IndexEntry, SearchHit, VectorStore};
use crate::error::{HuskError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-memory vector store.
pub struct MemoryVectorStore {
    entries: RwLock<BTreeMap<String, IndexEntry>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    fn poisoned<E: std::fmt::Display>(e: E) -> HuskError {
        HuskError::VectorStore(format!("Failed to acquire lock: {}", e))
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert(&self, entry: &IndexEntry) -> Result<()> {
        let mut entries = self.entries.write().map_err(Self::poisoned)?;
        entries.insert(entry.id.clone(), entry.clone());
        Ok(())
    }

    async fn query(&self, embedding: &[f32], n_results: usize) -> Result<Vec<SearchHit>> {
        let entries = self.entries.read().map_err(Self::poisoned)?;
        Ok(rank(entries.values().cloned(), embedding, n_results))
    }

    async fn list_all(&self) -> Result<Vec<IndexEntry>> {
        let entries = self.entries.read().map_err(Self::poisoned)?;
        Ok(entries.values().cloned().collect())
    }

    async fn count(&self) -> Result<usize> {
        let entries = self.entries.read().map_err(Self::poisoned)?;
        Ok(entries.len())
    }

    async fn clear(&self) -> Result<usize> {
        let mut entries = self.entries.write().map_err(Self::poisoned)?;
        let removed = entries.len();
        entries.clear();
        Ok(removed)
    }
}
