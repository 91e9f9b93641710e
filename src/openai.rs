//! Client factory for OpenAI-compatible APIs.
//!
//! The same client talks to api.openai.com or to any server exposing the
//! OpenAI `/v1` surface (Ollama, llama.cpp, vLLM) when `api_base` is set.

use crate::config::LlmSettings;
use crate::error::Result;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for API requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create a client from the `[llm]` settings.
///
/// A timeout of zero leaves requests unbounded.
pub fn create_client(settings: &LlmSettings) -> Result<Client<OpenAIConfig>> {
    let mut config = OpenAIConfig::default();
    if let Some(base) = settings.api_base.as_deref().filter(|b| !b.is_empty()) {
        config = config.with_api_base(base);
        // Local servers accept any key, but the header must be present.
        if std::env::var("OPENAI_API_KEY").map(|k| k.is_empty()).unwrap_or(true) {
            config = config.with_api_key("husk");
        }
    }

    let mut builder = reqwest::Client::builder();
    if settings.timeout_seconds > 0 {
        builder = builder.timeout(Duration::from_secs(settings.timeout_seconds));
    }
    let http_client = builder.build()?;

    Ok(Client::with_config(config).with_http_client(http_client))
}
