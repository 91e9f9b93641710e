//! Embedding and upserting corpus entries into the vector index.

use crate::config::{IdScheme, IndexSettings};
use crate::corpus::{Corpus, CorpusEntry};
use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::{EntryMetadata, IndexEntry, VectorStore};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Counts from one indexing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexReport {
    pub indexed: usize,
    /// Entries with no summary or detail text.
    pub skipped: usize,
}

/// Embeds corpus entries and stores them under a stable id.
pub struct Indexer {
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    id_scheme: IdScheme,
    default_location: String,
}

impl Indexer {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
        settings: &IndexSettings,
    ) -> Self {
        Self {
            embedder,
            vector_store,
            id_scheme: settings.id_scheme,
            default_location: settings.default_location.clone(),
        }
    }

    /// The index id an entry is stored under.
    pub fn entry_id(&self, entry: &CorpusEntry) -> String {
        match (self.id_scheme, entry.chunk_id) {
            (IdScheme::Chunk, Some(chunk_id)) => format!("{}#{}", entry.recording_name, chunk_id),
            _ => entry.recording_name.clone(),
        }
    }

    /// Embed and upsert one entry. Returns `false` when the entry has no text.
    #[instrument(skip(self, entry), fields(recording = %entry.recording_name))]
    pub async fn index_entry(&self, entry: &CorpusEntry) -> Result<bool> {
        let text = entry.index_text();
        if text.is_empty() {
            debug!("Skipping entry with no summary or detail");
            return Ok(false);
        }

        let embedding = self.embedder.embed(&text).await?;
        let location = entry
            .url_location
            .clone()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| self.default_location.clone());

        let index_entry = IndexEntry::new(
            self.entry_id(entry),
            embedding,
            EntryMetadata {
                text,
                recording_name: entry.recording_name.clone(),
                location,
            },
        );
        self.vector_store.upsert(&index_entry).await?;
        Ok(true)
    }

    /// Index every entry of the corpus, in order.
    pub async fn index_corpus(&self, corpus: &Corpus) -> Result<IndexReport> {
        let mut report = IndexReport::default();

        for entry in corpus.iter() {
            if self.index_entry(entry).await? {
                report.indexed += 1;
            } else {
                report.skipped += 1;
            }
        }

        info!(
            "Indexed {} entries ({} without text skipped)",
            report.indexed, report.skipped
        );
        Ok(report)
    }
}
