//! # SoftMax Pro `.pda` decoding
//!
//! A `.pda` export holds one or more experiment sections. Each section starts
//! with a version record followed by a `##BLOCKS=` header, then opaque plate
//! data, then the experiment record this crate extracts metadata from:
//!
//! ```text
//! <version> 00 0A "##BLOCKS= <n>" 00
//! ...opaque...
//! 13 "CSExperimentSection" <name> 00
//! [u32 padding ∈ {0, 1, 2}]
//! { 06 "CSNote" <title> 00 <u32 len> <body> }*
//! <instrument info> 00
//! [u32 padding ∈ {0}]
//! <strips> 00
//! u8 descriptor count: 1 → <trans> 00 | 2 → (<label> 00 <value> 00) × 2
//! f64 kinetic points, f64 read time, f64 interval
//! u32 n, n × u32 read wavelengths, f64 wells, n × u32 excitation wavelengths
//! ```
//!
//! All numbers are little-endian; text is ISO-8859-1.
//!
//! ## Multiple sections
//!
//! [`extract`] folds every section into a single [`ParameterSet`] in file order,
//! so for fields present in several sections the last section wins.
//! [`extract_sections`] keeps one set per section.

mod extractor;
mod scanner;
pub mod writer;


pub use extractor::{FieldExtractor, RawField};
pub use scanner::{Section, SectionScanner};
pub use writer::{ExperimentRecord, KineticRead, Note, PdaWriter, Transforms};

use log::warn;
use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::parameters::{ParameterMapper, ParameterSet};

/// Token that opens every experiment section
pub const SECTION_MARKER: &[u8] = b"##BLOCKS=";

/// Byte ending the version record in front of a section marker
pub const VERSION_TERMINATOR: u8 = 0x00;

/// Length-prefixed tag introducing the experiment record
pub const EXPERIMENT_TAG: &[u8] = b"\x13CSExperimentSection";

/// Length-prefixed tag introducing each note record
pub const NOTE_TAG: &[u8] = b"\x06CSNote";

/// Separator between rendered note records
pub const NOTE_SEPARATOR: &str = ". ";

/// Revision padding values that may follow the experiment name
pub const EXPERIMENT_PADDING: &[u32] = &[0, 1, 2];

/// Revision padding values that may follow the instrument info
pub const INSTRUMENT_PADDING: &[u32] = &[0];

/// Largest wavelength count whose lists are decoded
pub const MAX_WAVELENGTHS: usize = 16;

/// How sections of a multi-experiment file are reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractionPolicy {
    /// One set per file, later sections overwrite earlier ones
    #[default]
    Merged,
    /// One set per section
    PerSection,
}

/// Parameters extracted from one section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionParameters {
    /// Position of the section in the file
    pub index: usize,
    /// Offset of the section's first byte
    pub offset: usize,
    /// Extracted parameters
    pub parameters: ParameterSet,
}

/// Decode the raw fields of one section
pub fn extract_section_fields(bytes: &[u8], section: Section) -> Vec<RawField> {
    let mut cursor = ByteCursor::new(bytes);
    FieldExtractor::new(&mut cursor, section).extract()
}

/// Extract one parameter set per section, in file order
pub fn extract_sections(bytes: &[u8]) -> Vec<SectionParameters> {
    SectionScanner::new(bytes)
        .scan()
        .into_iter()
        .map(|section| SectionParameters {
            index: section.index,
            offset: section.head,
            parameters: ParameterMapper::map(extract_section_fields(bytes, section)),
        })
        .collect()
}

/// Extract a single merged parameter set for the whole file.
///
/// Returns an empty set when the buffer contains no section marker.
pub fn extract(bytes: &[u8]) -> ParameterSet {
    let sections = extract_sections(bytes);
    if sections.is_empty() {
        warn!("no experiment section found in {} byte(s)", bytes.len());
    }
    let mut merged = ParameterSet::new();
    for section in sections {
        merged.merge(section.parameters);
    }
    merged
}
