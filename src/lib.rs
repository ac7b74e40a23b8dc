//! # softmax-pda - Metadata extraction for SoftMax Pro exports
//!
//! `softmax_pda` decodes the undocumented binary `.pda` files that Molecular
//! Devices SoftMax Pro writes for FlexStation III microplate readers, and turns
//! each file into a flat, typed set of experiment parameters.
//!
//! ## Key Features
//!
//! - **Soft-failing byte primitives**: delimiter-terminated, length-prefixed and
//!   padding-skip readers that report absence instead of erroring.
//!
//! - **Multi-experiment files**: every `##BLOCKS=` section is decoded; sections
//!   are merged last-wins by default or reported individually.
//!
//! - **Partial extraction**: truncated or unusual files still yield whatever
//!   fields could be decoded.
//!
//! - **Lossless text**: notes are decoded as ISO-8859-1 so `\r` line breaks and
//!   glyphs like `µ` survive byte for byte.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use softmax_pda::parameters::ParameterName;
//!
//! let bytes = std::fs::read("050511V1 Pmutants rep1.pda")?;
//! let params = softmax_pda::pda::extract(&bytes);
//!
//! if let Some(version) = params.get_str(ParameterName::SoftmaxVersion) {
//!     println!("written by SoftMax Pro {version}");
//! }
//! println!("{}", params.to_json()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`cursor`]: seekable byte cursor
//! - [`tokens`]: token readers built on the cursor
//! - [`pda`]: section scanner, field extractor and layout writer
//! - [`parameters`]: parameter vocabulary, typed values and the token mapper
//! - [`filter`]: schema, parameter-store seam and the ingestion filter
//! - [`batch`]: many-file extraction

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod batch;
pub mod cursor;
pub mod filter;
pub mod parameters;
pub mod pda;
pub mod tokens;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::batch::{extract_all, BatchEntry, BatchStats};
    pub use crate::cursor::{ByteCursor, Checkpoint, CursorError};
    pub use crate::filter::{
        FileIdentity, FilterError, FilterOutcome, MemoryStore, ParameterSetRecord,
        ParameterStore, PdaFilter, Schema, StoreError, StoreOutcome,
    };
    pub use crate::parameters::{
        ParameterMapper, ParameterName, ParameterSet, ParameterValue, ValueKind,
    };
    pub use crate::pda::{
        extract, extract_sections, ExperimentRecord, ExtractionPolicy, PdaWriter, Section,
        SectionParameters, SectionScanner,
    };
    pub use crate::tokens::{
        read_until_byte_delimiter, read_until_string_delimiter, read_with_length_prefix,
        skip_if_number, Token, TokenValue, NUL,
    };
}
