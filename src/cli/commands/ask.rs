//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    cag: bool,
    corpus: Option<String>,
    model: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings.llm) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    let spinner = Output::spinner("Searching knowledge base...");

    let result = if cag {
        let corpus_dir = corpus.map(|dir| Settings::expand_path(&dir));
        let corpus = orchestrator.load_corpus(corpus_dir.as_deref())?;
        let mut answerer = orchestrator.corpus_answerer(&corpus);
        if let Some(model) = &model {
            answerer = answerer.with_model(model);
        }
        answerer.ask(question).await
    } else {
        let mut assembler = orchestrator.answer_assembler();
        if let Some(model) = &model {
            assembler = assembler.with_model(model);
        }
        assembler.ask(question).await
    };
    spinner.finish_and_clear();

    match result {
        Ok(answer) => {
            println!("\n{}\n", answer.format_for_display());
        }
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
