//! Nearest-record retrieval for a query.

use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::VectorStore;
use std::sync::Arc;
use tracing::{debug, instrument};

/// The record retrieved for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Retrieval {
    pub text: String,
    pub recording_name: String,
    pub location: String,
    /// Cosine distance to the query.
    pub distance: f32,
}

/// Embeds queries and looks up the closest index entry.
pub struct Retriever {
    vector_store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
}

impl Retriever {
    /// Create a retriever. `embedder` must be the one the index was built with.
    pub fn new(vector_store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            vector_store,
            embedder,
        }
    }

    /// Find the closest record, or None if there is nothing to match.
    ///
    /// A blank query matches nothing and is not embedded.
    #[instrument(skip(self))]
    pub async fn retrieve(&self, query: &str) -> Result<Option<Retrieval>> {
        if query.trim().is_empty() {
            debug!("Blank query, nothing to retrieve");
            return Ok(None);
        }

        let query_embedding = self.embedder.embed(query).await?;
        let hit = self
            .vector_store
            .query(&query_embedding, 1)
            .await?
            .into_iter()
            .next();

        Ok(hit.map(|hit| {
            debug!("Best match {} at distance {:.4}", hit.id, hit.distance);
            Retrieval {
                text: hit.metadata.text,
                recording_name: hit.metadata.recording_name,
                location: hit.metadata.location,
                distance: hit.distance,
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::test_support::TableEmbedder;
    use crate::vector_store::{EntryMetadata, IndexEntry, MemoryVectorStore};

    fn entry(id: &str, embedding: Vec<f32>) -> IndexEntry {
        IndexEntry::new(
            id.to_string(),
            embedding,
            EntryMetadata {
                text: format!("{} text", id),
                recording_name: id.to_string(),
                location: format!("/recordings/{}.mp4", id),
            },
        )
    }

    #[tokio::test]
    async fn test_empty_index_is_no_match() {
        let retriever = Retriever::new(
            Arc::new(MemoryVectorStore::new()),
            Arc::new(TableEmbedder::default()),
        );
        assert_eq!(retriever.retrieve("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_blank_query_skips_embedding() {
        let embedder = Arc::new(TableEmbedder::default());
        let store = Arc::new(MemoryVectorStore::new());
        store.upsert(&entry("a", vec![1.0, 0.0, 0.0])).await.unwrap();

        let retriever = Retriever::new(store, embedder.clone());
        assert_eq!(retriever.retrieve("   ").await.unwrap(), None);
        assert_eq!(embedder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_returns_closest_record() {
        let embedder = Arc::new(TableEmbedder::default().with("deploys", vec![0.9, 0.1, 0.0]));
        let store = Arc::new(MemoryVectorStore::new());
        store.upsert(&entry("deploy-review", vec![1.0, 0.0, 0.0])).await.unwrap();
        store.upsert(&entry("hiring-sync", vec![0.0, 1.0, 0.0])).await.unwrap();

        let retriever = Retriever::new(store, embedder);
        let found = retriever.retrieve("deploys").await.unwrap().unwrap();
        assert_eq!(found.recording_name, "deploy-review");
        assert_eq!(found.text, "deploy-review text");
        assert_eq!(found.location, "/recordings/deploy-review.mp4");
    }

    #[tokio::test]
    async fn test_ties_resolve_to_smallest_id() {
        let embedder = Arc::new(TableEmbedder::default().with("q", vec![1.0, 0.0, 0.0]));
        let store = Arc::new(MemoryVectorStore::new());
        store.upsert(&entry("b", vec![1.0, 0.0, 0.0])).await.unwrap();
        store.upsert(&entry("a", vec![2.0, 0.0, 0.0])).await.unwrap();

        let retriever = Retriever::new(store, embedder);
        for _ in 0..3 {
            let found = retriever.retrieve("q").await.unwrap().unwrap();
            assert_eq!(found.recording_name, "a");
        }
    }
}
