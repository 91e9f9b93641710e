//! List command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::vector_store::create_vector_store;
use anyhow::Result;
use std::collections::BTreeSet;

/// Run the list command.
pub async fn run_list(settings: Settings) -> Result<()> {
    let vector_store = create_vector_store(&settings)?;

    match vector_store.list_all().await {
        Ok(entries) => {
            if entries.is_empty() {
                Output::info("Nothing indexed yet. Use 'husk index' to add content.");
            } else {
                Output::header(&format!("Indexed Entries ({})", entries.len()));
                println!();

                for entry in &entries {
                    Output::index_entry(
                        &entry.id,
                        &entry.metadata.recording_name,
                        &entry.metadata.location,
                        &entry.metadata.text,
                    );
                }

                let recordings: BTreeSet<&str> = entries
                    .iter()
                    .map(|e| e.metadata.recording_name.as_str())
                    .collect();
                println!();
                Output::kv("Total entries", &entries.len().to_string());
                Output::kv("Recordings", &recordings.len().to_string());
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to list entries: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
