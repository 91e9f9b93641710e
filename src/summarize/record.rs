//! Extraction schema and persisted chunk records.

use crate::chunking::Chunk;
use crate::error::{HuskError, Result};
use serde::{Deserialize, Serialize};

/// Version of the extraction schema the prompt asks for.
pub const SCHEMA_VERSION: u32 = 1;

/// Short summary fields of a chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Summary {
    pub main_point: String,
    pub tools_or_methods: String,
    pub key_recommendations: String,
    pub brief_takeaway: String,
}

impl Summary {
    /// Non-empty fields joined by single spaces.
    pub fn text(&self) -> String {
        [
            &self.main_point,
            &self.tools_or_methods,
            &self.key_recommendations,
            &self.brief_takeaway,
        ]
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Named lists extracted from a chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailedExtraction {
    pub key_topics: Vec<String>,
    pub definitions_and_concepts: Vec<String>,
    pub processes_and_methodologies: Vec<String>,
    pub tools_and_technologies: Vec<String>,
    pub technical_insights_and_best_practices: Vec<String>,
    pub metrics_or_parameters: Vec<String>,
    pub decision_criteria_or_reasoning: Vec<String>,
}

impl DetailedExtraction {
    fn lists(&self) -> [&Vec<String>; 7] {
        [
            &self.key_topics,
            &self.definitions_and_concepts,
            &self.processes_and_methodologies,
            &self.tools_and_technologies,
            &self.technical_insights_and_best_practices,
            &self.metrics_or_parameters,
            &self.decision_criteria_or_reasoning,
        ]
    }

    /// All items in declaration order.
    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.lists()
            .into_iter()
            .flat_map(|list| list.iter().map(String::as_str))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn item_count(&self) -> usize {
        self.items().count()
    }

    /// All items joined by single spaces.
    pub fn text(&self) -> String {
        self.items().collect::<Vec<_>>().join(" ")
    }
}

/// The JSON object the model must return.
///
/// Fields the model adds beyond these (including any identity or timing it
/// invents) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionReply {
    pub detailed_extraction: DetailedExtraction,
    pub summary: Summary,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub presenter: Option<String>,
}

impl ExtractionReply {
    /// Parse a reply. The content must be exactly one JSON object with both
    /// sections present; surrounding prose or code fences are rejected. An
    /// all-blank extraction is still a valid reply.
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content.trim()).map_err(|e| {
            HuskError::Summarize(format!(
                "Reply is not valid extraction JSON: {}. Reply was: {}",
                e,
                content.chars().take(200).collect::<String>()
            ))
        })
    }
}

/// A chunk enriched with its extraction, as persisted per recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub chunk_id: u32,
    pub recording_name: String,
    /// Start formatted as `H:MM:SS`.
    pub start: String,
    /// End formatted as `H:MM:SS`.
    pub end: String,
    pub start_seconds: u64,
    pub end_seconds: u64,
    /// `"<start> - <end>"`.
    pub timestamp: String,
    pub text: String,
    pub presenter: String,
    pub tags: Vec<String>,
    pub summary: Summary,
    pub detailed_extraction: DetailedExtraction,
    pub schema_version: u32,
}

impl ChunkRecord {
    /// Combine a chunk with the model's extraction.
    pub fn from_extraction(recording_name: &str, chunk: &Chunk, extraction: ExtractionReply) -> Self {
        let presenter = extraction
            .presenter
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        Self {
            chunk_id: chunk.chunk_id,
            recording_name: recording_name.to_string(),
            start: chunk.start_label(),
            end: chunk.end_label(),
            start_seconds: chunk.start,
            end_seconds: chunk.end,
            timestamp: chunk.timestamp_label(),
            text: chunk.text.clone(),
            presenter,
            tags: extraction.tags,
            summary: extraction.summary,
            detailed_extraction: extraction.detailed_extraction,
            schema_version: SCHEMA_VERSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_valid_reply() {
        let reply = ExtractionReply::parse(
            r#"{"detailed_extraction": {}, "summary": {"brief_takeaway": "Ship weekly"}}"#,
        )
        .unwrap();
        assert_eq!(reply.summary.brief_takeaway, "Ship weekly");
        assert!(reply.tags.is_empty());
        assert!(reply.presenter.is_none());
    }

    #[test]
    fn test_parse_rejects_missing_sections() {
        assert!(ExtractionReply::parse(r#"{"summary": {"main_point": "x"}}"#).is_err());
        assert!(ExtractionReply::parse(r#"{"detailed_extraction": {"key_topics": ["x"]}}"#).is_err());
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        // Lists must hold strings, summary fields must be strings.
        assert!(ExtractionReply::parse(
            r#"{"detailed_extraction": {"key_topics": [{"name": "x"}]}, "summary": {}}"#
        )
        .is_err());
        assert!(ExtractionReply::parse(
            r#"{"detailed_extraction": {}, "summary": {"main_point": ["x"]}}"#
        )
        .is_err());
    }

    #[test]
    fn test_parse_rejects_prose_and_fences() {
        assert!(ExtractionReply::parse("Here you go: {}").is_err());
        assert!(ExtractionReply::parse("```json\n{\"detailed_extraction\": {}, \"summary\": {\"main_point\": \"x\"}}\n```").is_err());
    }

    #[test]
    fn test_parse_accepts_blank_skeleton() {
        let skeleton = r#"{
  "detailed_extraction": {
    "key_topics": [],
    "definitions_and_concepts": [],
    "processes_and_methodologies": [],
    "tools_and_technologies": [],
    "technical_insights_and_best_practices": [],
    "metrics_or_parameters": [],
    "decision_criteria_or_reasoning": []
  },
  "summary": {
    "main_point": "",
    "tools_or_methods": "",
    "key_recommendations": "",
    "brief_takeaway": ""
  },
  "tags": [],
  "presenter": "Unknown",
  "timestamp": "0:00:00 - 0:01:35"
}"#;
        let reply = ExtractionReply::parse(skeleton).unwrap();
        assert_eq!(reply.detailed_extraction.item_count(), 0);
        assert!(reply.summary.text().is_empty());

        let chunk = Chunk::new(1, 0, 95, "t".to_string());
        let record = ChunkRecord::from_extraction("r", &chunk, reply);
        assert_eq!(record.presenter, "Unknown");
        assert_eq!(record.timestamp, "0:00:00 - 0:01:35");
    }

    #[test]
    fn test_summary_and_extraction_text() {
        let summary = Summary {
            main_point: "A".to_string(),
            tools_or_methods: " ".to_string(),
            key_recommendations: "B".to_string(),
            brief_takeaway: "C".to_string(),
        };
        assert_eq!(summary.text(), "A B C");

        let extraction = DetailedExtraction {
            key_topics: vec!["t1".to_string(), "".to_string()],
            metrics_or_parameters: vec!["p99 < 200ms".to_string()],
            ..Default::default()
        };
        assert_eq!(extraction.text(), "t1 p99 < 200ms");
        assert_eq!(extraction.item_count(), 2);
    }

    #[test]
    fn test_blank_presenter_defaults_to_unknown() {
        let reply = ExtractionReply::parse(
            r#"{"detailed_extraction": {"key_topics": ["x"]}, "summary": {}, "presenter": "  "}"#,
        )
        .unwrap();
        let chunk = Chunk::new(1, 0, 10, "t".to_string());
        let record = ChunkRecord::from_extraction("r", &chunk, reply);
        assert_eq!(record.presenter, "Unknown");
    }
}
