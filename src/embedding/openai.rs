//! Embeddings over an OpenAI-compatible API.

use super::Embedder;
use crate::config::{EmbeddingSettings, LlmSettings};
use crate::error::{HuskError, Result};
use crate::openai::create_client;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Inputs per embeddings request.
const BATCH_SIZE: usize = 100;

/// OpenAI-compatible embedder.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dimensions: Option<u32>,
}

impl OpenAIEmbedder {
    pub fn new(llm: &LlmSettings, settings: &EmbeddingSettings) -> Result<Self> {
        Ok(Self {
            client: create_client(llm)?,
            model: settings.model.clone(),
            dimensions: settings.dimensions,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| HuskError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(BATCH_SIZE) {
            let mut args = CreateEmbeddingRequestArgs::default();
            args.model(&self.model)
                .input(EmbeddingInput::StringArray(batch.to_vec()));
            if let Some(dimensions) = self.dimensions {
                args.dimensions(dimensions);
            }
            let request = args
                .build()
                .map_err(|e| HuskError::Embedding(format!("Failed to build request: {}", e)))?;

            let response = self.client.embeddings().create(request).await.map_err(|e| {
                HuskError::OpenAI(format!("Embedding API error: {}", e))
            })?;

            if response.data.len() != batch.len() {
                return Err(HuskError::Embedding(format!(
                    "Expected {} embeddings, got {}",
                    batch.len(),
                    response.data.len()
                )));
            }

            // Sort by index to ensure correct order
            let mut embeddings: Vec<_> = response.data.into_iter().collect();
            embeddings.sort_by_key(|e| e.index);

            all_embeddings.extend(embeddings.into_iter().map(|e| e.embedding));
        }

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }
}
