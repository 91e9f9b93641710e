//! Answer generation from the single retrieved record.

use super::{Answer, Retrieval, Retriever};
use crate::config::{Prompts, RagSettings};
use crate::error::Result;
use crate::llm::{ChatMessage, ChatModel, ChatRequest};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Retrieves the closest record and asks the model to answer from it.
pub struct AnswerAssembler {
    retriever: Retriever,
    chat: Arc<dyn ChatModel>,
    model: String,
    temperature: f32,
    prompts: Prompts,
}

impl AnswerAssembler {
    pub fn new(retriever: Retriever, chat: Arc<dyn ChatModel>, settings: &RagSettings) -> Self {
        Self {
            retriever,
            chat,
            model: settings.model.clone(),
            temperature: settings.temperature,
            prompts: Prompts::default(),
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

    /// Answer a question.
    ///
    /// Transport failures from either collaborator are returned as errors.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn ask(&self, query: &str) -> Result<Answer> {
        let query = query.trim();
        info!("Processing question: {}", query);

        match self.retriever.retrieve(query).await? {
            Some(retrieval) => self.answer_from(query, &retrieval).await,
            None => Ok(Answer::no_match()),
        }
    }

    fn build_request(&self, query: &str, retrieval: &Retrieval) -> ChatRequest {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), query.to_string());
        vars.insert("context".to_string(), retrieval.text.clone());

        let messages = vec![
            ChatMessage::system(self.prompts.render_with_custom(&self.prompts.rag.system, &vars)),
            ChatMessage::user(self.prompts.render_with_custom(&self.prompts.rag.user, &vars)),
        ];

        ChatRequest::new(&self.model, messages).with_temperature(self.temperature)
    }

    async fn answer_from(&self, query: &str, retrieval: &Retrieval) -> Result<Answer> {
        let reply = self.chat.complete(self.build_request(query, retrieval)).await?;

        match reply.content {
            Some(content) => Ok(Answer::new(
                content.trim().to_string(),
                retrieval.recording_name.clone(),
                retrieval.location.clone(),
            )),
            None => {
                warn!("Model reply had no content");
                Ok(Answer::llm_error())
            }
        }
    }
}
