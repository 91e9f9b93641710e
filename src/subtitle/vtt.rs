//! WebVTT caption parsing.

use super::timestamp::parse_timestamp;
use super::Cue;
use regex::Regex;
use tracing::{debug, warn};

/// Arrow token separating the two timestamps of a cue timing line.
const ARROW: &str = "-->";

/// Line-oriented WebVTT parser.
pub struct VttParser {
    timestamp_regex: Regex,
}

/// Timing of the block currently being read.
enum Pending {
    /// Before the first timing line.
    None,
    /// Inside a well-formed cue.
    Cue { start: u64, end: u64 },
    /// Inside a block whose timing line was malformed; its text is dropped.
    Malformed,
}

impl VttParser {
    pub fn new() -> Self {
        let timestamp_regex = Regex::new(r"\d{2}:\d{2}:\d{2}\.\d{3}").expect("Invalid regex");
        Self { timestamp_regex }
    }

    /// Parse caption file content into cues in file order.
    ///
    /// Cue identifier lines (a block's first line when a timing line follows) and the
    /// `WEBVTT` header are not part of any cue's text. Overlapping or
    /// out-of-order cues are returned as they appear.
    pub fn parse(&self, content: &str) -> Vec<Cue> {
        let lines: Vec<&str> = content.lines().map(str::trim).collect();

        let mut cues = Vec::new();
        let mut pending = Pending::None;
        let mut text: Vec<&str> = Vec::new();

        for (i, &line) in lines.iter().enumerate() {
            if line.contains(ARROW) {
                Self::flush(&pending, &mut text, &mut cues);
                pending = self.parse_timing(line, i + 1);
            } else if !line.is_empty()
                && !line.starts_with("WEBVTT")
                && !Self::is_cue_identifier(&lines, i)
            {
                text.push(line);
            }
        }
        Self::flush(&pending, &mut text, &mut cues);

        debug!("Parsed {} cues", cues.len());
        cues
    }

    /// Read the two timestamps of a timing line.
    fn parse_timing(&self, line: &str, line_no: usize) -> Pending {
        let stamps: Vec<&str> = self
            .timestamp_regex
            .find_iter(line)
            .map(|m| m.as_str())
            .collect();

        if stamps.len() != 2 {
            warn!(
                "Dropping cue at line {}: expected 2 timestamps, found {}",
                line_no,
                stamps.len()
            );
            return Pending::Malformed;
        }

        match (parse_timestamp(stamps[0]), parse_timestamp(stamps[1])) {
            (Ok(start), Ok(end)) => Pending::Cue { start, end },
            (Err(e), _) | (_, Err(e)) => {
                warn!("Dropping cue at line {}: {}", line_no, e);
                Pending::Malformed
            }
        }
    }

    fn flush(pending: &Pending, text: &mut Vec<&str>, cues: &mut Vec<Cue>) {
        if let Pending::Cue { start, end } = pending {
            if !text.is_empty() {
                cues.push(Cue::new(*start, *end, text.join(" ")));
            }
        }
        text.clear();
    }

    /// A line opening a block and immediately followed by a timing line.
    fn is_cue_identifier(lines: &[&str], i: usize) -> bool {
        let opens_block = i == 0 || lines[i - 1].is_empty();
        opens_block && lines.get(i + 1).is_some_and(|next| next.contains(ARROW))
    }
}

impl Default for VttParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Vec<Cue> {
        VttParser::new().parse(content)
    }

    #[test]
    fn test_parse_basic_file() {
        let content = "WEBVTT\n\n\
            00:00:00.000 --> 00:00:04.500\n\
            Welcome to the review.\n\n\
            00:00:04.500 --> 00:00:09.000\n\
            First item on the agenda\n\
            is the release plan.\n";

        let cues = parse(content);
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0], Cue::new(0, 4, "Welcome to the review.".to_string()));
        assert_eq!(cues[1].start, 4);
        assert_eq!(cues[1].end, 9);
        assert_eq!(cues[1].text, "First item on the agenda is the release plan.");
    }

    #[test]
    fn test_cue_identifiers_and_settings_are_ignored() {
        let content = "WEBVTT\n\n\
            1\n\
            00:00:01.000 --> 00:00:02.000 align:start position:0%\n\
            hello\n\n\
            intro-2\n\
            00:00:02.000 --> 00:00:03.000\n\
            world\n";

        let cues = parse(content);
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, "hello");
        assert_eq!(cues[1].text, "world");
    }

    #[test]
    fn test_consecutive_markers_without_blank_lines() {
        let content = "00:00:01.000 --> 00:00:02.000\na\n00:00:02.000 --> 00:00:03.000\nb\n";
        let texts: Vec<String> = parse(content).into_iter().map(|c| c.text).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_no_markers_yields_no_cues() {
        assert!(parse("").is_empty());
        assert!(parse("WEBVTT\n\nNOTE just a note\n").is_empty());
    }

    #[test]
    fn test_header_metadata_is_not_attached_to_first_cue() {
        let content = "WEBVTT\nKind: captions\nLanguage: en\n\n00:00:01.000 --> 00:00:02.000\nhi\n";
        let cues = parse(content);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "hi");
    }

    #[test]
    fn test_malformed_marker_drops_its_block_only() {
        let content = "00:00:01.000 --> 00:00:02.000\nkept one\n\n\
            00:00:02.000 --> broken\nlost text\n\n\
            00:00:05.000 --> 00:00:06.000\nkept two\n";

        let cues = parse(content);
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, "kept one");
        assert_eq!(cues[0].end, 2);
        assert_eq!(cues[1].text, "kept two");
        assert_eq!(cues[1].start, 5);
    }

    #[test]
    fn test_marker_without_text_emits_nothing() {
        let content = "00:00:01.000 --> 00:00:02.000\n\n00:00:03.000 --> 00:00:04.000\nonly\n";
        let cues = parse(content);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].start, 3);
    }

    #[test]
    fn test_out_of_order_cues_pass_through() {
        let content = "00:00:10.000 --> 00:00:12.000\nlater\n\n00:00:01.000 --> 00:00:02.000\nearlier\n";
        let cues = parse(content);
        assert_eq!(cues[0].start, 10);
        assert_eq!(cues[1].start, 1);
    }
}
