//! Time-based chunking implementation.
//!
//! Folds cues into the open chunk until it covers at least the configured
//! duration, then closes it. Cues are never split.

use super::{Chunk, DEFAULT_CHUNK_DURATION};
use crate::subtitle::Cue;
use tracing::debug;

/// Time-based chunker.
#[derive(Debug, Clone, Copy)]
pub struct TemporalChunker {
    chunk_duration: u64,
}

impl TemporalChunker {
    pub fn new(chunk_duration: u64) -> Self {
        Self { chunk_duration }
    }

    /// Partition cues into chunks, in order.
    ///
    /// Every chunk except the last covers at least `chunk_duration` seconds;
    /// the last one takes whatever cues remain.
    pub fn chunk(&self, cues: &[Cue]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut texts: Vec<&str> = Vec::new();
        let mut current_start: Option<u64> = None;
        let mut current_end = 0;

        for cue in cues {
            let start = *current_start.get_or_insert(cue.start);
            texts.push(&cue.text);
            current_end = cue.end;

            if current_end.saturating_sub(start) >= self.chunk_duration {
                let chunk_id = chunks.len() as u32 + 1;
                chunks.push(Chunk::new(chunk_id, start, current_end, texts.join(" ")));
                texts.clear();
                current_start = None;
            }
        }

        if let Some(start) = current_start {
            let chunk_id = chunks.len() as u32 + 1;
            chunks.push(Chunk::new(chunk_id, start, current_end, texts.join(" ")));
        }

        debug!(
            "Chunked {} cues into {} chunks ({}s minimum)",
            cues.len(),
            chunks.len(),
            self.chunk_duration
        );
        chunks
    }
}

impl Default for TemporalChunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_DURATION)
    }
}
