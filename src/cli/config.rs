//! TOML configuration file support.
//!
//! ```toml
//! # pda-extract.toml
//! [schema]
//! name = "FLEXSTATION"
//! namespace = "http://rmit.edu.au/flexstation"
//!
//! [extraction]
//! per_section = false
//!
//! [output]
//! pretty = true
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use softmax_pda::filter::Schema;
use softmax_pda::pda::ExtractionPolicy;

/// Root configuration structure for pda-extract.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Schema the extracted sets are filed under.
    #[serde(default)]
    pub schema: SchemaConfig,

    /// Extraction behaviour.
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Output formatting.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Schema overrides.
#[derive(Debug, Default, Deserialize)]
pub struct SchemaConfig {
    /// Schema name.
    pub name: Option<String>,

    /// Schema namespace URI.
    pub namespace: Option<String>,
}

/// Extraction settings.
#[derive(Debug, Default, Deserialize)]
pub struct ExtractionConfig {
    /// Report one set per section instead of a merged set.
    pub per_section: Option<bool>,
}

/// Output settings.
#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON.
    pub pretty: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load from an optional path, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Schema with config overrides applied over the defaults.
    pub fn schema(&self) -> Schema {
        let default = Schema::default();
        Schema::new(
            self.schema.name.clone().unwrap_or(default.name),
            self.schema.namespace.clone().unwrap_or(default.namespace),
        )
    }

    /// Extraction policy, with the CLI flag taking precedence.
    pub fn policy(&self, per_section_flag: bool) -> ExtractionPolicy {
        if per_section_flag || self.extraction.per_section.unwrap_or(false) {
            ExtractionPolicy::PerSection
        } else {
            ExtractionPolicy::Merged
        }
    }

    /// Whether to pretty-print, with the CLI flag taking precedence.
    pub fn pretty(&self, pretty_flag: bool) -> bool {
        pretty_flag || self.output.pretty.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [schema]
            name = "Flexstation Test Schema"
            namespace = "http://rmit.edu.au/flexstation_test"

            [extraction]
            per_section = true

            [output]
            pretty = true
        "#;

        let config = Config::from_str(toml).unwrap();
        let schema = config.schema();
        assert_eq!(schema.name, "Flexstation Test Schema");
        assert_eq!(schema.namespace, "http://rmit.edu.au/flexstation_test");
        assert_eq!(config.policy(false), ExtractionPolicy::PerSection);
        assert!(config.pretty(false));
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [schema]
            name = "OTHER"
        "#;

        let config = Config::from_str(toml).unwrap();
        let schema = config.schema();
        assert_eq!(schema.name, "OTHER");
        assert_eq!(schema.namespace, "http://rmit.edu.au/flexstation");
        assert_eq!(config.policy(false), ExtractionPolicy::Merged);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.schema(), Schema::default());
        assert!(!config.pretty(false));
        assert_eq!(config.policy(true), ExtractionPolicy::PerSection);
    }

    #[test]
    fn test_invalid_config() {
        assert!(Config::from_str("[schema\nname = 1").is_err());
    }
}
