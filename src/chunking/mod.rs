//! Chunking of caption cues into time-bounded windows.
//!
//! A chunk is the unit that gets summarized, embedded and retrieved.

mod temporal;

pub use temporal::TemporalChunker;

use crate::subtitle::format_duration;
use serde::{Deserialize, Serialize};

/// Default minimum chunk duration in seconds.
pub const DEFAULT_CHUNK_DURATION: u64 = 90;

/// A duration-bounded merge of consecutive cues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// 1-based position of this chunk within its source file.
    pub chunk_id: u32,
    /// Start of the first cue, in seconds.
    pub start: u64,
    /// End of the last cue, in seconds.
    pub end: u64,
    /// Cue texts joined by single spaces.
    pub text: String,
}

impl Chunk {
    pub fn new(chunk_id: u32, start: u64, end: u64, text: String) -> Self {
        Self {
            chunk_id,
            start,
            end,
            text,
        }
    }

    /// Covered duration in seconds (zero if the cues ran backwards).
    pub fn duration(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Start formatted as `H:MM:SS`.
    pub fn start_label(&self) -> String {
        format_duration(self.start)
    }

    /// End formatted as `H:MM:SS`.
    pub fn end_label(&self) -> String {
        format_duration(self.end)
    }

    /// `"<start> - <end>"` range label.
    pub fn timestamp_label(&self) -> String {
        format!("{} - {}", self.start_label(), self.end_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_labels() {
        let chunk = Chunk::new(1, 65, 3700, "text".to_string());
        assert_eq!(chunk.duration(), 3635);
        assert_eq!(chunk.start_label(), "0:01:05");
        assert_eq!(chunk.end_label(), "1:01:40");
        assert_eq!(chunk.timestamp_label(), "0:01:05 - 1:01:40");
    }

    #[test]
    fn test_backwards_chunk_has_zero_duration() {
        let chunk = Chunk::new(1, 100, 40, String::new());
        assert_eq!(chunk.duration(), 0);
    }
}
