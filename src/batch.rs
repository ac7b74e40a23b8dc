//! Batch extraction over many files.
//!
//! Each file is an independent invocation with its own buffer and cursor, so
//! with the `parallel` feature files are processed on the rayon thread pool.
//! Results always come back in input order.

use std::path::{Path, PathBuf};

use log::debug;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::filter::{FilterError, ParameterSetRecord, PdaFilter};

/// Result of extracting one file in a batch
#[derive(Debug)]
pub struct BatchEntry {
    /// Input path
    pub path: PathBuf,
    /// Extracted record, or the I/O failure that prevented it
    pub result: Result<ParameterSetRecord, FilterError>,
}

/// Summary counts over a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Files read and decoded
    pub extracted: usize,
    /// Decoded files that produced no parameters
    pub empty: usize,
    /// Files that could not be read
    pub failed: usize,
}

impl BatchStats {
    /// Tally a set of batch entries
    pub fn from_entries(entries: &[BatchEntry]) -> Self {
        let mut stats = Self::default();
        for entry in entries {
            match &entry.result {
                Ok(record) if record.parameters.is_empty() => stats.empty += 1,
                Ok(_) => stats.extracted += 1,
                Err(_) => stats.failed += 1,
            }
        }
        stats
    }
}

fn extract_one(filter: &PdaFilter, path: &Path) -> BatchEntry {
    debug!("extracting {}", path.display());
    BatchEntry {
        path: path.to_path_buf(),
        result: filter.extract_path(path),
    }
}

/// Extract every path, in parallel when the `parallel` feature is enabled
#[cfg(feature = "parallel")]
pub fn extract_all(filter: &PdaFilter, paths: &[PathBuf]) -> Vec<BatchEntry> {
    paths.par_iter().map(|path| extract_one(filter, path)).collect()
}

/// Extract every path sequentially
#[cfg(not(feature = "parallel"))]
pub fn extract_all(filter: &PdaFilter, paths: &[PathBuf]) -> Vec<BatchEntry> {
    paths.iter().map(|path| extract_one(filter, path)).collect()
}
