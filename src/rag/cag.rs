//! Context-augmented answering over the whole corpus.
//!
//! Instead of retrieving one record, every record's brief takeaway goes into
//! the prompt. Suited to small corpora that fit in the model's context.

use super::Answer;
use crate::config::{Prompts, RagSettings};
use crate::corpus::Corpus;
use crate::error::Result;
use crate::llm::{ChatMessage, ChatModel, ChatRequest};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Build the prompt context from every entry with a brief takeaway.
pub fn build_corpus_context(corpus: &Corpus) -> String {
    corpus
        .iter()
        .filter_map(|entry| {
            entry.brief_takeaway().map(|takeaway| {
                format!(
                    "[{}] by {} at {}:\n{}",
                    entry.recording_name,
                    entry.presenter_or_unknown(),
                    entry.timestamp.as_deref().unwrap_or(""),
                    takeaway
                )
            })
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Answers questions against the whole loaded corpus.
pub struct CorpusAnswerer {
    chat: Arc<dyn ChatModel>,
    model: String,
    temperature: f32,
    prompts: Prompts,
    context: String,
}

impl CorpusAnswerer {
    /// The context is built once from `corpus`.
    pub fn new(chat: Arc<dyn ChatModel>, corpus: &Corpus, settings: &RagSettings) -> Self {
        let context = build_corpus_context(corpus);
        info!("Corpus context is {} characters", context.len());

        Self {
            chat,
            model: settings.cag_model.clone(),
            temperature: settings.temperature,
            prompts: Prompts::default(),
            context,
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Override the answering model.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// Answer a question. Source and location are always empty.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn ask(&self, query: &str) -> Result<Answer> {
        let query = query.trim();
        if query.is_empty() || self.context.is_empty() {
            return Ok(Answer::no_match());
        }

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), query.to_string());
        vars.insert("context".to_string(), self.context.clone());

        let messages = vec![
            ChatMessage::system(self.prompts.render_with_custom(&self.prompts.cag.system, &vars)),
            ChatMessage::user(self.prompts.render_with_custom(&self.prompts.cag.user, &vars)),
        ];
        let request = ChatRequest::new(&self.model, messages).with_temperature(self.temperature);

        let reply = self.chat.complete(request).await?;
        match reply.content {
            Some(content) => Ok(Answer::new(
                content.trim().to_string(),
                String::new(),
                String::new(),
            )),
            None => {
                warn!("Model reply had no content");
                Ok(Answer::llm_error())
            }
        }
    }
}
