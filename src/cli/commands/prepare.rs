//! Prepare command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{subtitle_files, Orchestrator};
use anyhow::Result;
use std::path::PathBuf;

/// Run the prepare command.
pub async fn run_prepare(
    input: Option<String>,
    output: Option<String>,
    files: &[String],
    duration: Option<u64>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Prepare, &settings.llm) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let input_dir = input
        .map(|dir| Settings::expand_path(&dir))
        .unwrap_or_else(|| settings.input_dir());
    let output_dir = output
        .map(|dir| Settings::expand_path(&dir))
        .unwrap_or_else(|| settings.output_dir());

    let paths: Vec<PathBuf> = if files.is_empty() {
        subtitle_files(&input_dir)?
    } else {
        files.iter().map(|f| Settings::expand_path(f)).collect()
    };

    if paths.is_empty() {
        Output::info(&format!("No .vtt files found in {}", input_dir.display()));
        return Ok(());
    }

    let orchestrator = Orchestrator::new(settings)?;

    Output::header(&format!("Preparing {} recordings", paths.len()));
    let pb = Output::progress_bar(paths.len() as u64, "summarizing");

    let summary = orchestrator
        .prepare_files(&paths, &output_dir, duration, |path| {
            pb.set_message(path.display().to_string());
            pb.inc(1);
        })
        .await;
    pb.finish_and_clear();

    for result in &summary.prepared {
        Output::prepared(&result.recording_name, result.records, result.chunks);
    }
    for (path, error) in &summary.failed {
        Output::error(&format!("{}: {}", path.display(), error));
    }

    Output::success(&format!(
        "Prepared {} recordings into {}",
        summary.prepared.len(),
        output_dir.display()
    ));
    if !summary.failed.is_empty() {
        Output::warning(&format!("{} recordings failed", summary.failed.len()));
    }

    Ok(())
}
