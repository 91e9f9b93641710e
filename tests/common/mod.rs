use async_trait::async_trait;
use husk::embedding::Embedder;
use husk::llm::{ChatModel, ChatReply, ChatRequest, Role};
use husk::Result;
use std::sync::Mutex;

pub const DIMENSIONS: usize = 64;

/// Bag-of-words embedder: each lowercase word bumps one hashed dimension.
pub struct WordEmbedder;

fn word_slot(word: &str) -> usize {
    let hash = word
        .bytes()
        .fold(0xcbf29ce484222325u64, |h, b| (h ^ b as u64).wrapping_mul(0x100000001b3));
    (hash % DIMENSIONS as u64) as usize
}

pub fn embed_words(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0; DIMENSIONS];
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        vector[word_slot(&word.to_lowercase())] += 1.0;
    }
    vector
}

#[async_trait]
impl Embedder for WordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(embed_words(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| embed_words(t)).collect())
    }
}

/// Plays both roles of the language model.
///
/// Extraction requests (JSON output) get a summary echoing the transcript.
/// Answer requests get `"answer: <context>"` so tests can see what was retrieved.
#[derive(Default)]
pub struct EchoChat {
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl EchoChat {
    pub fn answer_requests(&self) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| !r.json_output)
            .count()
    }
}

fn between<'a>(text: &'a str, open: &str, close: &str) -> &'a str {
    text.split_once(open)
        .and_then(|(_, rest)| rest.split_once(close).map(|(inner, _)| inner))
        .unwrap_or("")
        .trim()
}

#[async_trait]
impl ChatModel for EchoChat {
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply> {
        self.requests.lock().unwrap().push(request.clone());

        let user = request
            .messages
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();

        if request.json_output {
            let transcript = between(&user, "\"\"\"", "\"\"\"");
            if transcript.contains("garbled") {
                return Ok(ChatReply::text("I could not summarize this part."));
            }
            let reply = serde_json::json!({
                "detailed_extraction": {"key_topics": [transcript]},
                "summary": {"main_point": transcript, "brief_takeaway": transcript},
                "tags": ["meeting"],
                "presenter": "Robin"
            });
            return Ok(ChatReply::text(reply.to_string()));
        }

        let context = between(&user, "Context:", "\n\nQuestion:");
        Ok(ChatReply::text(format!("answer: {}\n", context)))
    }
}
