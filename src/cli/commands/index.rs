//! Index command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the index command.
pub async fn run_index(corpus: Option<String>, clear: bool, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Index, &settings.llm) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    let corpus_dir = corpus.map(|dir| Settings::expand_path(&dir));
    let corpus = orchestrator.load_corpus(corpus_dir.as_deref())?;

    if corpus.is_empty() {
        Output::info("Corpus is empty. Use 'husk prepare' to create chunk files first.");
        if !clear {
            return Ok(());
        }
    }

    let spinner = Output::spinner(&format!("Embedding {} entries...", corpus.len()));
    let result = orchestrator.build_index(&corpus, clear).await;
    spinner.finish_and_clear();

    let report = result?;
    Output::success(&format!("Indexed {} entries", report.indexed));
    if report.skipped > 0 {
        Output::kv("Skipped (no text)", &report.skipped.to_string());
    }
    Output::kv(
        "Total in index",
        &orchestrator.vector_store().count().await?.to_string(),
    );

    Ok(())
}
