//! Language-model collaborator.
//!
//! Callers build a role-tagged message list and read the reply's text
//! content; everything vendor-specific stays behind [`ChatModel`].

mod openai;

pub use openai::OpenAIChatModel;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One role-tagged message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A chat completion request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature; None leaves the server default.
    pub temperature: Option<f32>,
    /// Ask the server to constrain the reply to a JSON object.
    pub json_output: bool,
}

impl ChatRequest {
    pub fn new(model: &str, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.to_string(),
            messages,
            temperature: None,
            json_output: false,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_json_output(mut self, json_output: bool) -> Self {
        self.json_output = json_output;
        self
    }
}

/// Reply from the model.
///
/// `content` is None when the reply lacks the expected text field, which
/// callers treat as a contract violation rather than a transport error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatReply {
    pub content: Option<String>,
}

impl ChatReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    pub fn empty() -> Self {
        Self { content: None }
    }
}

/// Trait for chat-completion backends.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send one request and wait for the reply.
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply>;
}
