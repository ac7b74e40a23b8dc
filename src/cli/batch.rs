use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use softmax_pda::batch::{extract_all, BatchStats};
use softmax_pda::filter::PdaFilter;

use super::Config;

/// Extract many files and print one JSON record per line
pub fn run(files: Vec<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let config = Config::load(config.as_deref())?;
    let filter = PdaFilter::new(config.schema());

    info!("Extracting {} file(s)", files.len());
    let entries = extract_all(&filter, &files);

    for entry in &entries {
        match &entry.result {
            Ok(record) => {
                let line = serde_json::to_string(record).context("Failed to serialize record")?;
                println!("{line}");
            }
            Err(e) => eprintln!("{}: {}", entry.path.display(), e),
        }
    }

    let stats = BatchStats::from_entries(&entries);
    info!(
        "Batch complete: {} extracted, {} empty, {} failed",
        stats.extracted, stats.empty, stats.failed
    );

    if stats.failed > 0 {
        anyhow::bail!("{} file(s) could not be read", stats.failed);
    }
    Ok(())
}
