use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::parameters::ParameterSet;

/// Default schema name used when registering the FlexStation filter
pub const DEFAULT_SCHEMA_NAME: &str = "FLEXSTATION";

/// Default schema namespace used when registering the FlexStation filter
pub const DEFAULT_SCHEMA_NAMESPACE: &str = "http://rmit.edu.au/flexstation";

/// Schema identifying where a parameter set is filed.
///
/// Metadata only; the decoder never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Schema {
    /// Human-readable schema name
    pub name: String,
    /// Schema namespace URI
    pub namespace: String,
}

impl Schema {
    /// Create a schema
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEMA_NAME, DEFAULT_SCHEMA_NAMESPACE)
    }
}

/// Identity of a processed file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileIdentity {
    /// File name
    pub name: String,
    /// Full path, when the bytes came from disk
    pub path: Option<String>,
    /// Size in bytes
    pub size_bytes: u64,
}

impl FileIdentity {
    /// Identity for an in-memory buffer
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            path: None,
            size_bytes,
        }
    }

    /// Identity for a file on disk
    pub fn from_path(path: &Path, size_bytes: u64) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            path: Some(path.display().to_string()),
            size_bytes,
        }
    }
}

/// Parameter set handed to a store, with its provenance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSetRecord {
    /// Schema the set is filed under
    pub schema: Schema,
    /// Source file
    pub file: FileIdentity,
    /// Extracted parameters
    pub parameters: ParameterSet,
}

/// Result of handing a parameter set to a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// A new set was stored
    Created,
    /// The file already had a set for this schema; nothing changed
    AlreadyPresent,
}

/// Errors raised by parameter stores
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend could not be reached or written
    #[error("Parameter store unavailable: {0}")]
    Unavailable(String),

    /// Set rejected by the backend
    #[error("Parameter set rejected: {0}")]
    Rejected(String),
}

/// Persistence collaborator for extracted parameter sets.
///
/// Storing is idempotent per `(file, schema)`: a second store for the same key
/// must return [`StoreOutcome::AlreadyPresent`] and leave the first set intact.
pub trait ParameterStore {
    /// Whether a set exists for this file and schema
    fn contains(&self, file: &FileIdentity, schema: &Schema) -> bool;

    /// Store a set, suppressing duplicates
    fn store(
        &mut self,
        file: &FileIdentity,
        schema: &Schema,
        parameters: ParameterSet,
    ) -> Result<StoreOutcome, StoreError>;
}

/// In-memory [`ParameterStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    sets: HashMap<(FileIdentity, Schema), ParameterSet>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored set for a file and schema
    pub fn get(&self, file: &FileIdentity, schema: &Schema) -> Option<&ParameterSet> {
        self.sets.get(&(file.clone(), schema.clone()))
    }

    /// Number of sets stored for a file, across schemas
    pub fn count_for(&self, file: &FileIdentity) -> usize {
        self.sets.keys().filter(|(f, _)| f == file).count()
    }

    /// Total number of stored sets
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl ParameterStore for MemoryStore {
    fn contains(&self, file: &FileIdentity, schema: &Schema) -> bool {
        self.get(file, schema).is_some()
    }

    fn store(
        &mut self,
        file: &FileIdentity,
        schema: &Schema,
        parameters: ParameterSet,
    ) -> Result<StoreOutcome, StoreError> {
        let key = (file.clone(), schema.clone());
        if self.sets.contains_key(&key) {
            return Ok(StoreOutcome::AlreadyPresent);
        }
        self.sets.insert(key, parameters);
        Ok(StoreOutcome::Created)
    }
}
