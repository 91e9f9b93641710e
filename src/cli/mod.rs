//! CLI module for Husk.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Husk - question answering over meeting recordings
///
/// Turns WebVTT subtitles into summarized time-windowed chunks, indexes them
/// for semantic search and answers questions with the recording they came from.
#[derive(Parser, Debug)]
#[command(name = "husk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a subtitle file into time windows and print them as JSON
    Chunk {
        /// Path to a .vtt file
        file: String,

        /// Minimum chunk length in seconds
        #[arg(short, long)]
        duration: Option<u64>,
    },

    /// Parse, chunk and summarize subtitle files into chunk records
    Prepare {
        /// Directory of .vtt files (defaults to chunking.input_dir)
        #[arg(short, long)]
        input: Option<String>,

        /// Directory for the JSON chunk files (defaults to chunking.output_dir)
        #[arg(short, long)]
        output: Option<String>,

        /// Prepare only these files instead of the whole input directory
        #[arg(short, long)]
        file: Vec<String>,

        /// Minimum chunk length in seconds
        #[arg(short, long)]
        duration: Option<u64>,
    },

    /// Embed the chunk records and store them in the vector index
    Index {
        /// Directory of chunk files (defaults to index.corpus_dir)
        #[arg(long)]
        corpus: Option<String>,

        /// Remove every indexed entry first
        #[arg(long)]
        clear: bool,
    },

    /// Ask a question
    Ask {
        /// The question to ask
        question: String,

        /// Answer from every record's takeaway instead of the closest record
        #[arg(long)]
        cag: bool,

        /// Directory of chunk files used with --cag (defaults to index.corpus_dir)
        #[arg(long)]
        corpus: Option<String>,

        /// LLM model to use for response generation
        #[arg(short, long)]
        model: Option<String>,
    },

    /// List indexed entries
    List,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Serve the existing index without re-indexing the corpus
        #[arg(long)]
        no_index: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the default configuration file if none exists
    Init,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prepare_with_files() {
        let cli = Cli::parse_from([
            "husk", "-vv", "prepare", "--file", "a.vtt", "--file", "b.vtt", "-d", "60",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Prepare { file, duration, input, .. } => {
                assert_eq!(file, vec!["a.vtt", "b.vtt"]);
                assert_eq!(duration, Some(60));
                assert!(input.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_ask_cag() {
        let cli = Cli::parse_from(["husk", "ask", "what shipped?", "--cag", "-c", "alt.toml"]);
        assert_eq!(cli.config.as_deref(), Some("alt.toml"));
        match cli.command {
            Commands::Ask { question, cag, model, .. } => {
                assert_eq!(question, "what shipped?");
                assert!(cag);
                assert!(model.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::parse_from(["husk", "serve"]);
        match cli.command {
            Commands::Serve { host, port, no_index } => {
                assert!(host.is_none());
                assert!(port.is_none());
                assert!(!no_index);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
