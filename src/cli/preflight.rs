//! Pre-flight checks before expensive operations.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::config::LlmSettings;
use crate::error::{HuskError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Summarizing chunks calls the language model.
    Prepare,
    /// Indexing calls the embedding model.
    Index,
    /// Answering calls both.
    Ask,
    /// Chunking and listing need nothing external.
    Local,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, llm: &LlmSettings) -> Result<()> {
    match operation {
        Operation::Prepare | Operation::Index | Operation::Ask => {
            if llm.uses_hosted_api() {
                check_api_key()?;
            }
        }
        Operation::Local => {}
    }
    Ok(())
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(HuskError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(HuskError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...' \
             or point llm.api_base at a local server"
                .to_string(),
        )),
    }
}
