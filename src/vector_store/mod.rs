//! Vector index abstraction for Husk.
//!
//! Provides a trait-based interface for different vector index backends.
//! Entries are keyed by id with upsert semantics; queries return the nearest
//! entries by cosine distance, ties broken by ascending id.

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::config::Settings;
use crate::error::{HuskError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Retrievable metadata stored with each vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// The text that was embedded.
    pub text: String,
    pub recording_name: String,
    /// URL or path of the source recording.
    pub location: String,
}

/// A vector stored in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Unique id; upserting an existing id replaces the entry.
    pub id: String,
    pub embedding: Vec<f32>,
    pub metadata: EntryMetadata,
}

impl IndexEntry {
    pub fn new(id: String, embedding: Vec<f32>, metadata: EntryMetadata) -> Self {
        Self {
            id,
            embedding,
            metadata,
        }
    }
}

/// A nearest-neighbor match.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub metadata: EntryMetadata,
    /// Cosine distance (`1 - similarity`), lower is closer.
    pub distance: f32,
}

/// Trait for vector index implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or replace an entry by id.
    async fn upsert(&self, entry: &IndexEntry) -> Result<()>;

    /// The `n_results` entries closest to `embedding`, closest first.
    async fn query(&self, embedding: &[f32], n_results: usize) -> Result<Vec<SearchHit>>;

    /// Every stored entry, ordered by id.
    async fn list_all(&self) -> Result<Vec<IndexEntry>>;

    /// Total entry count.
    async fn count(&self) -> Result<usize>;

    /// Remove every entry. Returns how many were removed.
    async fn clear(&self) -> Result<usize>;
}

/// Create the vector store selected by `[vector_store].provider`.
pub fn create_vector_store(settings: &Settings) -> Result<Arc<dyn VectorStore>> {
    match settings.vector_store.provider.to_lowercase().as_str() {
        "sqlite" => Ok(Arc::new(SqliteVectorStore::new(&settings.sqlite_path())?)),
        "memory" => Ok(Arc::new(MemoryVectorStore::new())),
        other => Err(HuskError::Config(format!(
            "Unknown vector store provider: {}",
            other
        ))),
    }
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Rank `entries` (already in id order) against a query.
pub(crate) fn rank<I>(entries: I, query: &[f32], n_results: usize) -> Vec<SearchHit>
where
    I: IntoIterator<Item = IndexEntry>,
{
    let mut hits: Vec<SearchHit> = entries
        .into_iter()
        .map(|entry| SearchHit {
            distance: 1.0 - cosine_similarity(query, &entry.embedding),
            id: entry.id,
            metadata: entry.metadata,
        })
        .collect();

    // Stable sort keeps id order among equal distances.
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits.truncate(n_results);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, embedding: Vec<f32>) -> IndexEntry {
        IndexEntry::new(
            id.to_string(),
            embedding,
            EntryMetadata {
                text: id.to_string(),
                recording_name: id.to_string(),
                location: "#".to_string(),
            },
        )
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);

        assert_eq!(cosine_similarity(&a, &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_rank_orders_by_distance_then_id() {
        let entries = vec![
            entry("a", vec![0.0, 1.0]),
            entry("b", vec![1.0, 0.0]),
            entry("c", vec![2.0, 0.0]),
        ];

        let hits = rank(entries, &[1.0, 0.0], 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "b");
        assert_eq!(hits[1].id, "c");
        assert!(hits[0].distance.abs() < 0.001);
    }

    #[test]
    fn test_create_vector_store_rejects_unknown_provider() {
        let mut settings = Settings::default();
        settings.vector_store.provider = "chroma".to_string();
        assert!(create_vector_store(&settings).is_err());

        settings.vector_store.provider = "memory".to_string();
        assert!(create_vector_store(&settings).is_ok());
    }
}
