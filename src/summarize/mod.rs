//! Per-chunk knowledge extraction.
//!
//! Each chunk is sent once to the language model with a fixed extraction
//! prompt. The reply must be a JSON object matching [`SCHEMA_VERSION`] of the
//! extraction schema; replies that don't parse are skipped.

mod record;

pub use record::{ChunkRecord, DetailedExtraction, ExtractionReply, Summary, SCHEMA_VERSION};

use crate::chunking::Chunk;
use crate::config::{Prompts, SummarizationSettings};
use crate::error::{HuskError, Result};
use crate::llm::{ChatMessage, ChatModel, ChatRequest};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Sends chunks to a language model and builds [`ChunkRecord`]s.
pub struct Summarizer {
    chat: Arc<dyn ChatModel>,
    model: String,
    temperature: f32,
    json_mode: bool,
    prompts: Prompts,
}

/// Outcome of summarizing one recording.
#[derive(Debug, Default)]
pub struct SummaryBatch {
    pub records: Vec<ChunkRecord>,
    /// Ids of chunks whose extraction failed.
    pub skipped: Vec<u32>,
}

impl Summarizer {
    pub fn new(chat: Arc<dyn ChatModel>, settings: &SummarizationSettings) -> Self {
        Self {
            chat,
            model: settings.model.clone(),
            temperature: settings.temperature,
            json_mode: settings.json_mode,
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Build the extraction request for one chunk.
    pub fn build_request(&self, chunk: &Chunk) -> ChatRequest {
        let mut vars = HashMap::new();
        vars.insert("transcript".to_string(), chunk.text.clone());
        vars.insert("start".to_string(), chunk.start_label());
        vars.insert("end".to_string(), chunk.end_label());

        let mut messages = Vec::with_capacity(2);
        if !self.prompts.summary.system.trim().is_empty() {
            messages.push(ChatMessage::system(
                self.prompts.render_with_custom(&self.prompts.summary.system, &vars),
            ));
        }
        messages.push(ChatMessage::user(
            self.prompts.render_with_custom(&self.prompts.summary.user, &vars),
        ));

        ChatRequest::new(&self.model, messages)
            .with_temperature(self.temperature)
            .with_json_output(self.json_mode)
    }

    /// Summarize one chunk.
    ///
    /// The returned record's identity and timing come from the chunk, never
    /// from the model's reply.
    #[instrument(skip(self, chunk), fields(chunk_id = chunk.chunk_id))]
    pub async fn summarize_chunk(&self, recording_name: &str, chunk: &Chunk) -> Result<ChunkRecord> {
        let reply = self.chat.complete(self.build_request(chunk)).await?;

        let content = reply
            .content
            .ok_or_else(|| HuskError::Summarize("Reply has no content".to_string()))?;

        let extraction = ExtractionReply::parse(&content)?;
        debug!("Extracted {} items", extraction.detailed_extraction.item_count());

        Ok(ChunkRecord::from_extraction(recording_name, chunk, extraction))
    }

    /// Summarize every chunk of a recording, one call at a time.
    ///
    /// A chunk that fails for any reason is logged and skipped; the rest
    /// still get processed.
    pub async fn summarize_chunks(&self, recording_name: &str, chunks: &[Chunk]) -> SummaryBatch {
        let mut batch = SummaryBatch::default();

        for chunk in chunks {
            match self.summarize_chunk(recording_name, chunk).await {
                Ok(record) => batch.records.push(record),
                Err(e) => {
                    warn!("Error in chunk {} of {}: {}", chunk.chunk_id, recording_name, e);
                    batch.skipped.push(chunk.chunk_id);
                }
            }
        }

        info!(
            "Summarized {}/{} chunks of {}",
            batch.records.len(),
            chunks.len(),
            recording_name
        );
        batch
    }
}

/// Write one recording's records as a pretty-printed JSON array.
pub fn write_records(path: &Path, records: &[ChunkRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatReply, Role};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays canned replies in order and records requests.
    struct ScriptedChat {
        replies: Mutex<Vec<Result<ChatReply>>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedChat {
        fn new(replies: Vec<Result<ChatReply>>) -> Self {
            let mut replies = replies;
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedChat {
        async fn complete(&self, request: ChatRequest) -> Result<ChatReply> {
            self.requests.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(ChatReply::empty()))
        }
    }

    fn valid_reply(takeaway: &str) -> String {
        serde_json::json!({
            "detailed_extraction": {
                "key_topics": ["caching"],
                "tools_and_technologies": ["redis"]
            },
            "summary": {
                "main_point": "Cache hot keys",
                "tools_or_methods": "Redis",
                "key_recommendations": "Set TTLs",
                "brief_takeaway": takeaway
            },
            "tags": ["perf"],
            "presenter": "Dana",
            "timestamp": "9:99:99 - 9:99:99",
            "chunk_id": 42,
            "recording_name": "hallucinated"
        })
        .to_string()
    }

    fn chunks() -> Vec<Chunk> {
        vec![
            Chunk::new(1, 0, 95, "first part".to_string()),
            Chunk::new(2, 95, 190, "second part".to_string()),
            Chunk::new(3, 190, 200, "third part".to_string()),
        ]
    }

    fn summarizer(chat: Arc<ScriptedChat>) -> Summarizer {
        Summarizer::new(chat, &SummarizationSettings::default())
    }

    #[tokio::test]
    async fn test_identity_comes_from_chunk_not_model() {
        let chat = Arc::new(ScriptedChat::new(vec![Ok(ChatReply::text(valid_reply("ok")))]));
        let record = summarizer(chat)
            .summarize_chunk("weekly-sync", &chunks()[1])
            .await
            .unwrap();

        assert_eq!(record.chunk_id, 2);
        assert_eq!(record.recording_name, "weekly-sync");
        assert_eq!(record.start, "0:01:35");
        assert_eq!(record.end, "0:03:10");
        assert_eq!(record.timestamp, "0:01:35 - 0:03:10");
        assert_eq!(record.text, "second part");
        assert_eq!(record.presenter, "Dana");
        assert_eq!(record.summary.brief_takeaway, "ok");
        assert_eq!(record.schema_version, SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_request_carries_prompt_and_json_mode() {
        let chat = Arc::new(ScriptedChat::new(vec![Ok(ChatReply::text(valid_reply("ok")))]));
        summarizer(chat.clone())
            .summarize_chunk("r", &chunks()[0])
            .await
            .unwrap();

        let requests = chat.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert!(request.json_output);
        assert_eq!(request.messages.last().unwrap().role, Role::User);
        let user = &request.messages.last().unwrap().content;
        assert!(user.contains("first part"));
        assert!(user.contains("\"timestamp\": \"0:00:00 - 0:01:35\""));
    }

    #[tokio::test]
    async fn test_failed_chunks_are_skipped_not_fatal() {
        let chat = Arc::new(ScriptedChat::new(vec![
            Ok(ChatReply::text(valid_reply("one"))),
            Ok(ChatReply::text("Sure! Here is the JSON you asked for")),
            Err(HuskError::OpenAI("connection reset".to_string())),
        ]));

        let batch = summarizer(chat.clone()).summarize_chunks("r", &chunks()).await;

        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].chunk_id, 1);
        assert_eq!(batch.skipped, vec![2, 3]);
        assert_eq!(chat.requests.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_content_is_skipped() {
        let chat = Arc::new(ScriptedChat::new(vec![Ok(ChatReply::empty())]));
        let batch = summarizer(chat).summarize_chunks("r", &chunks()[..1]).await;
        assert!(batch.records.is_empty());
        assert_eq!(batch.skipped, vec![1]);
    }

    #[test]
    fn test_write_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("talk.json");
        let extraction = ExtractionReply::parse(&valid_reply("x")).unwrap();
        let record = ChunkRecord::from_extraction("talk", &chunks()[0], extraction);

        write_records(&path, &[record]).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 1);
        assert_eq!(array[0]["recording_name"], "talk");
        assert_eq!(array[0]["summary"]["brief_takeaway"], "x");
    }
}
