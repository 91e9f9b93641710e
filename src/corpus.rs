//! Loading persisted chunk records back as a corpus.
//!
//! The corpus is read once, explicitly, and handed to the indexer and the
//! context-augmented answerer. Entries are read leniently so that files
//! written by older tools (plain-string summaries, `detail_summary`,
//! `url_location`) still load.

use crate::error::{HuskError, Result};
use crate::summarize::{DetailedExtraction, Summary};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A summary as found on disk: either the structured object or a plain string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SummaryField {
    Text(String),
    Structured(Summary),
}

impl SummaryField {
    pub fn text(&self) -> String {
        match self {
            SummaryField::Text(text) => text.trim().to_string(),
            SummaryField::Structured(summary) => summary.text(),
        }
    }

    /// The one-line takeaway, only present on structured summaries.
    pub fn brief_takeaway(&self) -> Option<&str> {
        match self {
            SummaryField::Text(_) => None,
            SummaryField::Structured(summary) => Some(summary.brief_takeaway.trim()),
        }
    }
}

/// One persisted record, read leniently.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CorpusEntry {
    pub recording_name: String,
    pub chunk_id: Option<u32>,
    pub summary: Option<SummaryField>,
    pub detail_summary: Option<String>,
    pub detailed_extraction: Option<DetailedExtraction>,
    pub url_location: Option<String>,
    pub presenter: Option<String>,
    pub timestamp: Option<String>,
}

impl CorpusEntry {
    pub fn summary_text(&self) -> String {
        self.summary.as_ref().map(SummaryField::text).unwrap_or_default()
    }

    /// `detail_summary` when present, otherwise the extraction lists.
    pub fn detail_text(&self) -> String {
        match (&self.detail_summary, &self.detailed_extraction) {
            (Some(detail), _) => detail.trim().to_string(),
            (None, Some(extraction)) => extraction.text(),
            (None, None) => String::new(),
        }
    }

    /// The text that gets embedded: summary and detail, space-joined and trimmed.
    pub fn index_text(&self) -> String {
        format!("{} {}", self.summary_text(), self.detail_text())
            .trim()
            .to_string()
    }

    pub fn brief_takeaway(&self) -> Option<&str> {
        self.summary
            .as_ref()
            .and_then(SummaryField::brief_takeaway)
            .filter(|t| !t.is_empty())
    }

    pub fn presenter_or_unknown(&self) -> &str {
        self.presenter
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or("Unknown")
    }
}

/// All entries of a corpus directory, in file-name order then array order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    entries: Vec<CorpusEntry>,
    files: Vec<PathBuf>,
}

impl Corpus {
    pub fn from_entries(entries: Vec<CorpusEntry>) -> Self {
        Self {
            entries,
            files: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CorpusEntry> {
        self.entries.iter()
    }

    /// Files the entries were read from.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load every `*.json` file of `dir` and concatenate their arrays.
///
/// A missing directory is an error. Files that are not a JSON array, and
/// array elements that are not records, are skipped with a warning.
pub fn load_corpus(dir: &Path) -> Result<Corpus> {
    if !dir.is_dir() {
        return Err(HuskError::Corpus(format!(
            "Corpus directory not found: {}",
            dir.display()
        )));
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("json"))
                    .unwrap_or(false)
        })
        .collect();
    paths.sort();

    let mut corpus = Corpus::default();
    for path in paths {
        match read_corpus_file(&path) {
            Ok(entries) => {
                debug!("Loaded {} entries from {:?}", entries.len(), path);
                corpus.entries.extend(entries);
                corpus.files.push(path);
            }
            Err(e) => warn!("Skipping corpus file {:?}: {}", path, e),
        }
    }

    info!(
        "Loaded {} corpus entries from {} files",
        corpus.entries.len(),
        corpus.files.len()
    );
    Ok(corpus)
}

fn read_corpus_file(path: &Path) -> Result<Vec<CorpusEntry>> {
    let content = std::fs::read_to_string(path)?;
    let values: Vec<serde_json::Value> = serde_json::from_str(&content)?;

    let mut entries = Vec::with_capacity(values.len());
    for (i, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<CorpusEntry>(value) {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!("Skipping entry {} of {:?}: {}", i, path, e),
        }
    }
    Ok(entries)
}
