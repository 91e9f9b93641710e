//! Configuration settings for Husk.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub llm: LlmSettings,
    pub chunking: ChunkingSettings,
    pub summarization: SummarizationSettings,
    pub embedding: EmbeddingSettings,
    pub index: IndexSettings,
    pub vector_store: VectorStoreSettings,
    pub rag: RagSettings,
    pub server: ServerSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level when no `-v` flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.husk".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl GeneralSettings {
    /// Log level for a `-v` count; zero falls back to the configured level.
    pub fn effective_log_level(&self, verbose: u8) -> &str {
        match verbose {
            0 => self.log_level.as_str(),
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Connection settings shared by every language-model and embedding call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Base URL of an OpenAI-compatible API. None = api.openai.com.
    /// For a local Ollama use "http://localhost:11434/v1".
    pub api_base: Option<String>,
    /// Request timeout in seconds (0 disables the timeout).
    pub timeout_seconds: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_base: None,
            timeout_seconds: crate::openai::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LlmSettings {
    /// Whether calls go to the hosted OpenAI API (and so need a real key).
    pub fn uses_hosted_api(&self) -> bool {
        self.api_base.as_deref().map(str::is_empty).unwrap_or(true)
    }
}

/// Subtitle chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Minimum covered duration of a chunk in seconds.
    pub chunk_duration_seconds: u64,
    /// Directory scanned for `.vtt` files.
    pub input_dir: String,
    /// Directory receiving one JSON array per recording.
    pub output_dir: String,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_duration_seconds: 90,
            input_dir: "./vtt".to_string(),
            output_dir: "./chunked_json".to_string(),
        }
    }
}

/// Chunk summarization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizationSettings {
    /// LLM model used for extraction.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Ask the server for a JSON-object response format.
    pub json_mode: bool,
}

impl Default for SummarizationSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            json_mode: true,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Requested embedding dimensions. Leave unset for servers that
    /// don't support truncation (most local models).
    pub dimensions: Option<u32>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimensions: Some(1536),
        }
    }
}

/// How index entry ids are derived from corpus entries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    /// `<recording_name>#<chunk_id>`, one entry per chunk.
    #[default]
    Chunk,
    /// `<recording_name>`, one entry per recording (last chunk wins).
    Recording,
}

/// Indexing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Directory of persisted chunk files loaded at startup.
    pub corpus_dir: String,
    /// Index entry id scheme.
    pub id_scheme: IdScheme,
    /// Location stored for entries that carry no `url_location`.
    pub default_location: String,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            corpus_dir: "./chunked_json".to_string(),
            id_scheme: IdScheme::Chunk,
            default_location: "#".to_string(),
        }
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    /// Vector store provider (sqlite, memory).
    pub provider: String,
    /// Path to SQLite database (for sqlite provider).
    pub sqlite_path: String,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            provider: "sqlite".to_string(),
            sqlite_path: "~/.husk/index.db".to_string(),
        }
    }
}

/// Question answering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// LLM model for retrieval-augmented answers.
    pub model: String,
    /// LLM model for whole-corpus (context-augmented) answers.
    pub cag_model: String,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            cag_model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Embed and upsert the corpus before accepting requests.
    pub index_on_startup: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
            index_on_startup: true,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else if path.is_some() {
            Err(crate::error::HuskError::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )))
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::HuskError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("husk")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded SQLite database path.
    pub fn sqlite_path(&self) -> PathBuf {
        Self::expand_path(&self.vector_store.sqlite_path)
    }

    pub fn input_dir(&self) -> PathBuf {
        Self::expand_path(&self.chunking.input_dir)
    }

    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.chunking.output_dir)
    }

    pub fn corpus_dir(&self) -> PathBuf {
        Self::expand_path(&self.index.corpus_dir)
    }
}
