//! Chunk command implementation.

use crate::chunking::TemporalChunker;
use crate::config::Settings;
use crate::subtitle::read_vtt_file;
use anyhow::{bail, Result};
use std::path::Path;

/// Run the chunk command: print the chunks of one subtitle file as JSON.
pub fn run_chunk(file: &str, duration: Option<u64>, settings: &Settings) -> Result<()> {
    let duration = duration.unwrap_or(settings.chunking.chunk_duration_seconds);
    if duration == 0 {
        bail!("Chunk duration must be at least one second");
    }

    let cues = read_vtt_file(&Settings::expand_path(file))
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", Path::new(file).display(), e))?;
    let chunks = TemporalChunker::new(duration).chunk(&cues);

    println!("{}", serde_json::to_string_pretty(&chunks)?);
    Ok(())
}
