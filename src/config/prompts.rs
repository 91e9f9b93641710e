//! Prompt templates for Husk.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub summary: SummaryPrompts,
    pub rag: RagPrompts,
    pub cag: CagPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for per-chunk knowledge extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPrompts {
    pub system: String,
    pub user: String,
}

impl Default for SummaryPrompts {
    fn default() -> Self {
        Self {
            system: "You extract structured knowledge from transcripts. Reply with a single JSON object and nothing else.".to_string(),

            user: r#"You are an AI assistant specialized in extracting and summarizing technical knowledge from audio recordings. Your task is to analyze the following transcript segment and return ONLY a JSON object with clearly structured outputs.

Output this format:

{
  "detailed_extraction": {
    "key_topics": [],
    "definitions_and_concepts": [],
    "processes_and_methodologies": [],
    "tools_and_technologies": [],
    "technical_insights_and_best_practices": [],
    "metrics_or_parameters": [],
    "decision_criteria_or_reasoning": []
  },
  "summary": {
    "main_point": "",
    "tools_or_methods": "",
    "key_recommendations": "",
    "brief_takeaway": ""
  },
  "tags": [],
  "presenter": "Unknown",
  "timestamp": "{{start}} - {{end}}"
}

Transcript:
"""
{{transcript}}
""""#.to_string(),
        }
    }
}

/// Prompts for single-record retrieval-augmented answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    pub system: String,
    pub user: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            system: "You are an expert assistant. Answer questions concisely based only on the provided transcript.".to_string(),
            user: "Context: {{context}}\n\nQuestion: {{question}}\n\nAnswer concisely and directly.".to_string(),
        }
    }
}

/// Prompts for whole-corpus (context-augmented) answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CagPrompts {
    pub system: String,
    pub user: String,
}

impl Default for CagPrompts {
    fn default() -> Self {
        Self {
            system: "You are a technical assistant. Use the provided context to answer the user's question. Be concise and include the recording name and presenter when relevant.".to_string(),
            user: "Context:\n{{context}}\n\nQuestion: {{question}}".to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let summary_path = custom_path.join("summary.toml");
            if summary_path.exists() {
                let content = std::fs::read_to_string(&summary_path)?;
                prompts.summary = toml::from_str(&content)?;
            }

            let rag_path = custom_path.join("rag.toml");
            if rag_path.exists() {
                let content = std::fs::read_to_string(&rag_path)?;
                prompts.rag = toml::from_str(&content)?;
            }

            let cag_path = custom_path.join("cag.toml");
            if cag_path.exists() {
                let content = std::fs::read_to_string(&cag_path)?;
                prompts.cag = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Substitution is single-pass, so values containing `{{...}}` (transcript
    /// text, user questions) are never expanded themselves.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find("{{") {
            result.push_str(&rest[..open]);
            let after = &rest[open + 2..];
            match after.find("}}") {
                Some(close) => {
                    let key = &after[..close];
                    match vars.get(key) {
                        Some(value) => result.push_str(value),
                        None => {
                            result.push_str("{{");
                            result.push_str(key);
                            result.push_str("}}");
                        }
                    }
                    rest = &after[close + 2..];
                }
                None => {
                    result.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        result.push_str(rest);
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.summary.user.contains("{{transcript}}"));
        assert!(prompts.summary.user.contains("\"timestamp\": \"{{start}} - {{end}}\""));
        assert!(!prompts.rag.system.is_empty());
        assert!(!prompts.cag.system.is_empty());
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_render_does_not_expand_inserted_values() {
        let mut vars = HashMap::new();
        vars.insert("transcript".to_string(), "say {{start}} now".to_string());
        vars.insert("start".to_string(), "0:00:00".to_string());

        let result = Prompts::render("[{{transcript}}] at {{start}}", &vars);
        assert_eq!(result, "[say {{start}} now] at 0:00:00");
    }

    #[test]
    fn test_render_keeps_unknown_and_unclosed_placeholders() {
        let vars = HashMap::new();
        assert_eq!(Prompts::render("a {{missing}} b", &vars), "a {{missing}} b");
        assert_eq!(Prompts::render("a {{open", &vars), "a {{open");
    }

    #[test]
    fn test_custom_variables_are_overridden_by_call_vars() {
        let mut custom = HashMap::new();
        custom.insert("team".to_string(), "platform".to_string());
        custom.insert("question".to_string(), "ignored".to_string());
        let prompts = Prompts::load(None, Some(&custom)).unwrap();

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "why?".to_string());

        let rendered = prompts.render_with_custom("{{team}}: {{question}}", &vars);
        assert_eq!(rendered, "platform: why?");
    }

    #[test]
    fn test_load_custom_dir_overrides_rag() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("rag.toml"),
            "system = \"custom system\"\nuser = \"Q: {{question}}\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.rag.system, "custom system");
        assert_eq!(prompts.rag.user, "Q: {{question}}");
        assert!(prompts.summary.user.contains("detailed_extraction"));
    }
}
