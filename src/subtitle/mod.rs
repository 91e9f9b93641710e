//! Subtitle input: timestamp utilities and the WebVTT cue parser.

pub mod timestamp;
mod vtt;

pub use timestamp::{format_duration, parse_timestamp};
pub use vtt::VttParser;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One timestamped caption entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue {
    /// Start time in whole seconds.
    pub start: u64,
    /// End time in whole seconds.
    pub end: u64,
    /// Caption text, lines joined by single spaces.
    pub text: String,
}

impl Cue {
    pub fn new(start: u64, end: u64, text: String) -> Self {
        Self { start, end, text }
    }
}

/// Read and parse a captions file.
pub fn read_vtt_file(path: &Path) -> Result<Vec<Cue>> {
    let content = std::fs::read_to_string(path)?;
    Ok(VttParser::new().parse(&content))
}

/// Base name of a source file, used as the recording name.
pub fn recording_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Whether a path has a `.vtt` extension (case-insensitive).
pub fn is_vtt_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("vtt"))
        .unwrap_or(false)
}
