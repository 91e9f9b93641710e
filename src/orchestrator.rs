//! Pipeline orchestrator for Husk.
//!
//! Coordinates preparation (subtitles to summarized chunk files), indexing
//! and answering, wiring the collaborators from settings.

use crate::chunking::{Chunk, TemporalChunker};
use crate::config::{Prompts, Settings};
use crate::corpus::{load_corpus, Corpus};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{HuskError, Result};
use crate::indexer::{IndexReport, Indexer};
use crate::llm::{ChatModel, OpenAIChatModel};
use crate::rag::{AnswerAssembler, CorpusAnswerer, Retriever};
use crate::subtitle::{is_vtt_file, read_vtt_file, recording_name};
use crate::summarize::{write_records, Summarizer};
use crate::vector_store::{create_vector_store, VectorStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// The main orchestrator for the Husk pipeline.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    chat: Arc<dyn ChatModel>,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
}

impl Orchestrator {
    /// Create an orchestrator backed by the configured API and vector store.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let chat: Arc<dyn ChatModel> = Arc::new(OpenAIChatModel::new(&settings.llm)?);
        let embedder: Arc<dyn Embedder> =
            Arc::new(OpenAIEmbedder::new(&settings.llm, &settings.embedding)?);
        let vector_store = create_vector_store(&settings)?;

        info!(
            "Using {} for summaries, {} for embeddings, {} vector store",
            settings.summarization.model, settings.embedding.model, settings.vector_store.provider
        );

        Ok(Self {
            settings,
            prompts,
            chat,
            embedder,
            vector_store,
        })
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        chat: Arc<dyn ChatModel>,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            settings,
            prompts,
            chat,
            embedder,
            vector_store,
        }
    }

    /// Get a reference to the vector store.
    pub fn vector_store(&self) -> Arc<dyn VectorStore> {
        self.vector_store.clone()
    }

    /// Chunker for the configured duration, or `duration` when given.
    pub fn chunker(&self, duration: Option<u64>) -> Result<TemporalChunker> {
        let duration = duration.unwrap_or(self.settings.chunking.chunk_duration_seconds);
        if duration == 0 {
            return Err(HuskError::InvalidInput(
                "Chunk duration must be at least one second".to_string(),
            ));
        }
        Ok(TemporalChunker::new(duration))
    }

    /// Parse and chunk one subtitle file without calling any collaborator.
    pub fn chunk_file(&self, path: &Path, duration: Option<u64>) -> Result<Vec<Chunk>> {
        let chunker = self.chunker(duration)?;
        let cues = read_vtt_file(path)?;
        Ok(chunker.chunk(&cues))
    }

    /// Parse, chunk and summarize one subtitle file, writing
    /// `<output_dir>/<base name>.json`.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn prepare_file(
        &self,
        path: &Path,
        output_dir: &Path,
        duration: Option<u64>,
    ) -> Result<PrepareResult> {
        let recording = recording_name(path);
        let chunks = self.chunk_file(path, duration)?;
        info!("{}: {} chunks", recording, chunks.len());

        let summarizer = Summarizer::new(self.chat.clone(), &self.settings.summarization)
            .with_prompts(self.prompts.clone());
        let batch = summarizer.summarize_chunks(&recording, &chunks).await;

        let output_path = output_dir.join(format!("{}.json", recording));
        write_records(&output_path, &batch.records)?;
        info!("Wrote {} records to {:?}", batch.records.len(), output_path);

        Ok(PrepareResult {
            recording_name: recording,
            output_path,
            chunks: chunks.len(),
            records: batch.records.len(),
            skipped_chunks: batch.skipped,
        })
    }

    /// Prepare several files one after another, calling `on_file` before
    /// each one.
    ///
    /// A file that fails is logged and reported; the others still run.
    pub async fn prepare_files<F>(
        &self,
        paths: &[PathBuf],
        output_dir: &Path,
        duration: Option<u64>,
        mut on_file: F,
    ) -> PrepareSummary
    where
        F: FnMut(&Path),
    {
        let mut summary = PrepareSummary::default();

        for path in paths {
            on_file(path);
            match self.prepare_file(path, output_dir, duration).await {
                Ok(result) => summary.prepared.push(result),
                Err(e) => {
                    warn!("Failed to prepare {:?}: {}", path, e);
                    summary.failed.push((path.clone(), e.to_string()));
                }
            }
        }

        summary
    }

    /// Load the corpus from `dir`, or the configured corpus directory.
    pub fn load_corpus(&self, dir: Option<&Path>) -> Result<Corpus> {
        match dir {
            Some(dir) => load_corpus(dir),
            None => load_corpus(&self.settings.corpus_dir()),
        }
    }

    /// Embed and upsert every corpus entry, optionally clearing the index first.
    #[instrument(skip(self, corpus), fields(entries = corpus.len()))]
    pub async fn build_index(&self, corpus: &Corpus, clear: bool) -> Result<IndexReport> {
        if clear {
            let removed = self.vector_store.clear().await?;
            info!("Cleared {} existing entries", removed);
        }

        Indexer::new(
            self.embedder.clone(),
            self.vector_store.clone(),
            &self.settings.index,
        )
        .index_corpus(corpus)
        .await
    }

    /// Single-record retrieval answerer over the current index.
    pub fn answer_assembler(&self) -> AnswerAssembler {
        AnswerAssembler::new(
            Retriever::new(self.vector_store.clone(), self.embedder.clone()),
            self.chat.clone(),
            &self.settings.rag,
        )
        .with_prompts(self.prompts.clone())
    }

    /// Whole-corpus answerer.
    pub fn corpus_answerer(&self, corpus: &Corpus) -> CorpusAnswerer {
        CorpusAnswerer::new(self.chat.clone(), corpus, &self.settings.rag)
            .with_prompts(self.prompts.clone())
    }
}

/// List subtitle files in `dir`, sorted by name.
pub fn subtitle_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(HuskError::InvalidInput(format!(
            "Input directory not found: {}",
            dir.display()
        )));
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_vtt_file(path))
        .collect();
    files.sort();
    Ok(files)
}

/// Result of preparing one subtitle file.
#[derive(Debug)]
pub struct PrepareResult {
    pub recording_name: String,
    pub output_path: PathBuf,
    /// Chunks produced from the subtitles.
    pub chunks: usize,
    /// Chunks that were summarized and written.
    pub records: usize,
    pub skipped_chunks: Vec<u32>,
}

/// Results of preparing several files.
#[derive(Debug, Default)]
pub struct PrepareSummary {
    pub prepared: Vec<PrepareResult>,
    pub failed: Vec<(PathBuf, String)>,
}
