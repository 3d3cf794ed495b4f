//! List command - show stored artifacts

use crate::cli::args::{ListArgs, OutputFormat};
use crate::config::{Config, ConfigManager};
use crate::error::TesseraResult;
use crate::store::{BlobStore, FsBlobStore};
use console::style;

/// Execute the list command
pub async fn execute(args: ListArgs, config: &Config) -> TesseraResult<()> {
    let dir = ConfigManager::artifacts_dir(config);
    let store = FsBlobStore::open(&dir).await?;
    let keys = store.list().await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&keys)?),
        OutputFormat::Plain => {
            for key in &keys {
                println!("{}", key);
            }
        }
        OutputFormat::Table => {
            if keys.is_empty() {
                println!("No artifacts stored.");
                return Ok(());
            }

            println!("{}", style("ARTIFACT").bold());
            println!("{}", "-".repeat(40));
            for key in &keys {
                println!("{}", key);
            }
            println!();
            println!("{} artifact(s) in {}", keys.len(), dir.display());
        }
    }

    Ok(())
}
