//! Chat completions over an OpenAI-compatible API.

use super::{ChatModel, ChatReply, ChatRequest, Role};
use crate::config::LlmSettings;
use crate::error::{HuskError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Chat model backed by `async-openai`.
pub struct OpenAIChatModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
}

impl OpenAIChatModel {
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        Ok(Self {
            client: create_client(settings)?,
        })
    }

    fn to_openai_messages(request: &ChatRequest) -> Result<Vec<ChatCompletionRequestMessage>> {
        request
            .messages
            .iter()
            .map(|m| -> Result<ChatCompletionRequestMessage> {
                let message: ChatCompletionRequestMessage = match m.role {
                    Role::System => ChatCompletionRequestSystemMessageArgs::default()
                        .content(m.content.clone())
                        .build()
                        .map_err(|e| HuskError::OpenAI(e.to_string()))?
                        .into(),
                    Role::User => ChatCompletionRequestUserMessageArgs::default()
                        .content(m.content.clone())
                        .build()
                        .map_err(|e| HuskError::OpenAI(e.to_string()))?
                        .into(),
                };
                Ok(message)
            })
            .collect()
    }
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    #[instrument(skip(self, request), fields(model = %request.model, messages = request.messages.len()))]
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply> {
        let messages = Self::to_openai_messages(&request)?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&request.model).messages(messages);
        if let Some(temperature) = request.temperature {
            args.temperature(temperature);
        }
        if request.json_output {
            args.response_format(ResponseFormat::JsonObject);
        }
        let api_request = args.build().map_err(|e| HuskError::OpenAI(e.to_string()))?;

        let response = self.client.chat().create(api_request).await.map_err(|e| {
            HuskError::OpenAI(format!("Chat completion failed: {}", e))
        })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content);

        debug!(
            "Chat reply: {}",
            content
                .as_deref()
                .map(|c| c.chars().take(200).collect::<String>())
                .unwrap_or_else(|| "<none>".to_string())
        );

        Ok(ChatReply { content })
    }
}
