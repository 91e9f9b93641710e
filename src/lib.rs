//! Husk - question answering over meeting recordings
//!
//! Turns WebVTT subtitle files of recorded talks and meetings into a
//! searchable knowledge base and answers questions with the recording the
//! answer came from.
//!
//! # Overview
//!
//! Husk allows you to:
//! - Split subtitles into time windows of a configurable minimum length
//! - Extract structured summaries of each window with a language model
//! - Embed and index those summaries
//! - Ask questions against the closest record, or against every record's takeaway
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management and prompt templates
//! - `subtitle` - WebVTT parsing
//! - `chunking` - Time-window chunking of cues
//! - `llm` - Language-model collaborator
//! - `summarize` - Per-chunk structured extraction
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector index abstraction
//! - `corpus` - Loading persisted chunk records
//! - `indexer` - Embedding and upserting corpus entries
//! - `rag` - Retrieval and answer generation
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use husk::config::Settings;
//! use husk::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let corpus = orchestrator.load_corpus(None)?;
//!     let report = orchestrator.build_index(&corpus, false).await?;
//!     println!("Indexed {} entries", report.indexed);
//!
//!     let answer = orchestrator.answer_assembler().ask("What did we decide about deploys?").await?;
//!     println!("{} ({})", answer.response, answer.source);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod indexer;
pub mod llm;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod subtitle;
pub mod summarize;
pub mod vector_store;

pub use error::{HuskError, Result};
