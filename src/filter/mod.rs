//! # Ingestion filter
//!
//! Glue between the decoder and a parameter store: reads a file, skips files the
//! store already holds for the configured schema, extracts, and hands over the
//! resulting set.
//!
//! Reading the file is the only step that can fail; decoding never does.
//!
//! ```rust
//! use softmax_pda::filter::{FileIdentity, FilterOutcome, MemoryStore, PdaFilter, Schema};
//! use softmax_pda::pda::{ExperimentRecord, PdaWriter};
//!
//! let mut writer = PdaWriter::new();
//! writer.write_section(&ExperimentRecord::flexstation_demo());
//! let bytes = writer.finish();
//!
//! let filter = PdaFilter::new(Schema::default());
//! let mut store = MemoryStore::new();
//! let file = FileIdentity::new("rep1.pda", bytes.len() as u64);
//!
//! let first = filter.process(&file, &bytes, &mut store)?;
//! assert!(matches!(first, FilterOutcome::Stored { .. }));
//! let again = filter.process(&file, &bytes, &mut store)?;
//! assert_eq!(again, FilterOutcome::AlreadyProcessed);
//! # Ok::<(), softmax_pda::filter::FilterError>(())
//! ```

mod error;
mod store;

pub use error::FilterError;
pub use store::{
    FileIdentity, MemoryStore, ParameterSetRecord, ParameterStore, Schema, StoreError,
    StoreOutcome, DEFAULT_SCHEMA_NAME, DEFAULT_SCHEMA_NAMESPACE,
};

use std::path::Path;

use log::{info, warn};

use crate::parameters::ParameterSet;
use crate::pda;

/// What happened to a processed file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    /// A parameter set was stored
    Stored {
        /// Number of parameters in the stored set
        parameters: usize,
    },
    /// The store already had a set for this file and schema
    AlreadyProcessed,
    /// No section marker found; nothing stored
    NoParameters,
}

/// Extracts `.pda` metadata and files it under a schema
#[derive(Debug, Clone, Default)]
pub struct PdaFilter {
    schema: Schema,
}

impl PdaFilter {
    /// Create a filter for `schema`
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    /// Schema sets are filed under
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Read a whole file and its identity
    pub fn read_file(path: &Path) -> Result<(FileIdentity, Vec<u8>), FilterError> {
        let bytes = std::fs::read(path)?;
        let identity = FileIdentity::from_path(path, bytes.len() as u64);
        Ok((identity, bytes))
    }

    /// Extract the merged parameter set of a buffer
    pub fn extract(&self, bytes: &[u8]) -> ParameterSet {
        pda::extract(bytes)
    }

    /// Read and extract a file into a handoff record without storing it
    pub fn extract_path(&self, path: &Path) -> Result<ParameterSetRecord, FilterError> {
        let (file, bytes) = Self::read_file(path)?;
        Ok(ParameterSetRecord {
            schema: self.schema.clone(),
            file,
            parameters: self.extract(&bytes),
        })
    }

    /// Extract `bytes` and hand the result to `store`
    pub fn process<S: ParameterStore + ?Sized>(
        &self,
        file: &FileIdentity,
        bytes: &[u8],
        store: &mut S,
    ) -> Result<FilterOutcome, FilterError> {
        if store.contains(file, &self.schema) {
            info!("{} already has a {} parameter set", file.name, self.schema.name);
            return Ok(FilterOutcome::AlreadyProcessed);
        }

        let parameters = self.extract(bytes);
        if parameters.is_empty() {
            warn!("{}: no parameters extracted", file.name);
            return Ok(FilterOutcome::NoParameters);
        }

        let count = parameters.len();
        match store.store(file, &self.schema, parameters)? {
            StoreOutcome::Created => {
                info!("{}: stored {} parameter(s)", file.name, count);
                Ok(FilterOutcome::Stored { parameters: count })
            }
            StoreOutcome::AlreadyPresent => Ok(FilterOutcome::AlreadyProcessed),
        }
    }

    /// Read a file from disk and process it
    pub fn process_path<S: ParameterStore + ?Sized>(
        &self,
        path: &Path,
        store: &mut S,
    ) -> Result<FilterOutcome, FilterError> {
        let (file, bytes) = Self::read_file(path)?;
        self.process(&file, &bytes, store)
    }
}
