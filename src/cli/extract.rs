use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use softmax_pda::filter::{FileIdentity, ParameterSetRecord, PdaFilter, Schema};
use softmax_pda::pda::{self, ExtractionPolicy, SectionParameters};

use super::Config;

/// Per-section output record
#[derive(Serialize)]
struct SectionsRecord {
    schema: Schema,
    file: FileIdentity,
    sections: Vec<SectionParameters>,
}

/// Extract one file and print its JSON record
pub fn run(
    file: PathBuf,
    config: Option<PathBuf>,
    per_section: bool,
    pretty: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load(config.as_deref())?;
    let schema = config.schema();
    let pretty = config.pretty(pretty);

    let (identity, bytes) = PdaFilter::read_file(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    info!("Read {} ({} bytes)", identity.name, identity.size_bytes);

    let json = match config.policy(per_section) {
        ExtractionPolicy::Merged => {
            let filter = PdaFilter::new(schema);
            let record = ParameterSetRecord {
                schema: filter.schema().clone(),
                file: identity,
                parameters: filter.extract(&bytes),
            };
            info!("Extracted {} parameter(s)", record.parameters.len());
            to_json(&record, pretty)?
        }
        ExtractionPolicy::PerSection => {
            let sections = pda::extract_sections(&bytes);
            info!("Extracted {} section(s)", sections.len());
            let record = SectionsRecord {
                schema,
                file: identity,
                sections,
            };
            to_json(&record, pretty)?
        }
    };

    match output {
        Some(path) => {
            std::fs::write(&path, json + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize parameters")
}
