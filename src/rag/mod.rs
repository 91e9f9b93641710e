//! Question answering over the indexed meeting corpus.
//!
//! Two strategies share one response shape:
//! - [`AnswerAssembler`] retrieves the single closest record and answers from it.
//! - [`CorpusAnswerer`] puts every record's takeaway in the prompt.

mod answer;
mod cag;
mod retriever;

pub use answer::AnswerAssembler;
pub use cag::{build_corpus_context, CorpusAnswerer};
pub use retriever::{Retrieval, Retriever};

use serde::{Deserialize, Serialize};

/// Response when nothing relevant was found.
pub const NO_MATCH_RESPONSE: &str = "I couldn't find anything relevant.";

/// Response when the model's reply has no content.
pub const LLM_ERROR_RESPONSE: &str = "Error retrieving response from LLM.";

/// An answer with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub response: String,
    /// Recording name the answer was drawn from; empty when none.
    pub source: String,
    /// URL or path of that recording; empty when none.
    pub location: String,
}

impl Answer {
    pub fn new(response: String, source: String, location: String) -> Self {
        Self {
            response,
            source,
            location,
        }
    }

    pub fn no_match() -> Self {
        Self::new(NO_MATCH_RESPONSE.to_string(), String::new(), String::new())
    }

    pub fn llm_error() -> Self {
        Self::new(LLM_ERROR_RESPONSE.to_string(), String::new(), String::new())
    }

    /// Format the answer for terminal display.
    pub fn format_for_display(&self) -> String {
        let mut output = self.response.clone();

        if !self.source.is_empty() {
            output.push_str("\n\n--- Source ---\n");
            output.push_str(&self.source);
            if !self.location.is_empty() {
                output.push_str(&format!("\n  {}", self.location));
            }
        }

        output
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::embedding::Embedder;
    use crate::error::Result;
    use crate::llm::{ChatModel, ChatReply, ChatRequest};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Returns preset vectors per text, `[0, 0, 1]` for anything else.
    #[derive(Default)]
    pub struct TableEmbedder {
        pub vectors: HashMap<String, Vec<f32>>,
        pub calls: Mutex<Vec<String>>,
    }

    impl TableEmbedder {
        pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
            self.vectors.insert(text.to_string(), vector);
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Embedder for TableEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.lock().unwrap().push(text.to_string());
            Ok(self
                .vectors
                .get(text)
                .cloned()
                .unwrap_or_else(|| vec![0.0, 0.0, 1.0]))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }
    }

    /// Answers every request with the same reply and records the requests.
    pub struct FixedChat {
        pub reply: Mutex<Option<Result<ChatReply>>>,
        pub requests: Mutex<Vec<ChatRequest>>,
    }

    impl FixedChat {
        pub fn new(reply: Result<ChatReply>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatModel for FixedChat {
        async fn complete(&self, request: ChatRequest) -> Result<ChatReply> {
            self.requests.lock().unwrap().push(request);
            self.reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(ChatReply::empty()))
        }
    }
}
