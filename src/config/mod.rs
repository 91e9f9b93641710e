//! Configuration module for Husk.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{CagPrompts, Prompts, RagPrompts, SummaryPrompts};
pub use settings::{
    ChunkingSettings, EmbeddingSettings, GeneralSettings, IdScheme, IndexSettings, LlmSettings,
    PromptSettings, RagSettings, ServerSettings, Settings, SummarizationSettings,
    VectorStoreSettings,
};
