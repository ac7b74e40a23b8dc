use anyhow::{Context, Result};
use std::path::PathBuf;

#[cfg(feature = "colorized_output")]
use console::style;

use softmax_pda::filter::PdaFilter;
use softmax_pda::parameters::ParameterSet;
use softmax_pda::pda::{self, SectionScanner};

/// Longest value shown before truncating
const PREVIEW_LEN: usize = 72;

/// Display the sections and parameters of a .pda file
pub fn run(file: PathBuf) -> Result<()> {
    let (identity, bytes) = PdaFilter::read_file(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let sections = SectionScanner::new(&bytes).scan();
    let extracted = pda::extract_sections(&bytes);

    println!("{}", heading("SoftMax Pro Export"));
    println!("==================");
    println!("File: {}", identity.path.as_deref().unwrap_or(&identity.name));
    println!("Size: {} bytes", identity.size_bytes);
    println!("Sections: {}", sections.len());
    println!();

    for (section, params) in sections.iter().zip(&extracted) {
        println!(
            "{} {}  head={} marker={} end={} ({} bytes)",
            heading("Section"),
            section.index,
            section.head,
            section.marker,
            section.end,
            section.len()
        );
        print_parameters(&params.parameters);
        println!();
    }

    if sections.is_empty() {
        println!("No experiment sections found.");
    }
    Ok(())
}

fn print_parameters(params: &ParameterSet) {
    if params.is_empty() {
        println!("  (no parameters)");
        return;
    }
    for (name, value) in params.iter() {
        let text = value.to_string().replace('\r', "\u{21b5}");
        let preview = if text.chars().count() > PREVIEW_LEN {
            let cut: String = text.chars().take(PREVIEW_LEN).collect();
            format!("{cut}... ({} chars)", text.chars().count())
        } else {
            text
        };
        println!("  {:28} {}", name.as_str(), preview);
    }
}

#[cfg(feature = "colorized_output")]
fn heading(text: &str) -> String {
    style(text).bold().cyan().to_string()
}

#[cfg(not(feature = "colorized_output"))]
fn heading(text: &str) -> String {
    text.to_string()
}
