use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use softmax_pda::pda::{self, ExperimentRecord, Note, PdaWriter};

/// Opaque bytes written between consecutive sections
const SECTION_GAP: usize = 256;

/// Write a synthetic FlexStation III export
pub fn run(output: PathBuf, sections: usize) -> Result<()> {
    if sections == 0 {
        anyhow::bail!("At least one section is required");
    }

    let mut writer = PdaWriter::new();
    for index in 0..sections {
        if index > 0 {
            writer.write_raw(&[0u8; SECTION_GAP]);
        }
        writer.write_section(&demo_record(index));
    }
    let bytes = writer.finish();

    std::fs::write(&output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let params = pda::extract(&bytes);
    info!("Wrote {} ({} bytes)", output.display(), bytes.len());
    info!("  Sections: {}", sections);
    info!("  Parameters (merged): {}", params.len());
    Ok(())
}

/// Demo record for the `index`-th section; later sections differ so the merge is visible
fn demo_record(index: usize) -> ExperimentRecord {
    let mut record = ExperimentRecord::flexstation_demo();
    if index > 0 {
        record.version = format!("5.4.{}.1.0", 50 + index);
        record.experiment_name = format!("Exp{:02}", index + 1);
        record.notes.push(Note::new(
            "Intro",
            format!("Latin square run {}\r0.1\u{b5}g/ml tet", index + 1),
        ));
        record.instrument_info = "Flexstation III ROM v3.0.22 16Feb11".to_string();
        record.strips = "1-12".to_string();
        record.instrument_padding = Some(0);
        record.kinetic.points = 39.0;
        record.kinetic.read_time = 150.0;
    }
    record
}
