//! # Parameter Set
//!
//! The output of extraction: a flat, ordered mapping from a closed vocabulary of
//! parameter names to typed values. Keys iterate in the order their fields occur
//! in a `.pda` section, so serialized sets read top to bottom like the file.
//!
//! Absent fields are absent keys; there is no null value.

mod mapper;

pub use mapper::ParameterMapper;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Declared value type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Free text
    String,
    /// Floating point number
    Float,
    /// Integer
    Integer,
}

/// Closed vocabulary of extracted parameters, in byte-stream order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ParameterName {
    /// SoftMax Pro software version that wrote the section
    SoftmaxVersion,
    /// Experiment name
    ExperimentName,
    /// Analysis notes, `"Title: body"` records joined with `". "`
    AnalysisNotes,
    /// Instrument model and ROM identification
    InstrumentInfo,
    /// Plate strip range, e.g. `1-9`
    Strips,
    /// Combined transformation descriptor (older revisions)
    Trans,
    /// First of two split transformation descriptors
    Trans1,
    /// Second of two split transformation descriptors
    Trans2,
    /// Number of kinetic read points
    KineticPoints,
    /// Total kinetic read time
    KineticFlexReadTime,
    /// Interval between kinetic reads
    KineticFlexInterval,
    /// Number of wavelengths read
    NumberOfWavelengths,
    /// Space-separated read (emission) wavelengths
    ReadWavelength,
    /// Number of wells or cuvettes
    NumberOfWellsOrCuvette,
    /// Space-separated excitation wavelengths
    ExcitationWavelengths,
}

impl ParameterName {
    /// Every parameter name, in stream order
    pub const ALL: [ParameterName; 15] = [
        ParameterName::SoftmaxVersion,
        ParameterName::ExperimentName,
        ParameterName::AnalysisNotes,
        ParameterName::InstrumentInfo,
        ParameterName::Strips,
        ParameterName::Trans,
        ParameterName::Trans1,
        ParameterName::Trans2,
        ParameterName::KineticPoints,
        ParameterName::KineticFlexReadTime,
        ParameterName::KineticFlexInterval,
        ParameterName::NumberOfWavelengths,
        ParameterName::ReadWavelength,
        ParameterName::NumberOfWellsOrCuvette,
        ParameterName::ExcitationWavelengths,
    ];

    /// Wire name of the parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterName::SoftmaxVersion => "softmax_version",
            ParameterName::ExperimentName => "experiment_name",
            ParameterName::AnalysisNotes => "analysis_notes",
            ParameterName::InstrumentInfo => "instrument_info",
            ParameterName::Strips => "strips",
            ParameterName::Trans => "trans",
            ParameterName::Trans1 => "trans1",
            ParameterName::Trans2 => "trans2",
            ParameterName::KineticPoints => "kinetic_points",
            ParameterName::KineticFlexReadTime => "kinetic_flex_read_time",
            ParameterName::KineticFlexInterval => "kinetic_flex_interval",
            ParameterName::NumberOfWavelengths => "number_of_wavelengths",
            ParameterName::ReadWavelength => "read_wavelength",
            ParameterName::NumberOfWellsOrCuvette => "number_of_wells_or_cuvette",
            ParameterName::ExcitationWavelengths => "excitation_wavelengths",
        }
    }

    /// Declared value type
    pub fn kind(&self) -> ValueKind {
        match self {
            ParameterName::KineticPoints
            | ParameterName::KineticFlexReadTime
            | ParameterName::KineticFlexInterval
            | ParameterName::NumberOfWellsOrCuvette => ValueKind::Float,
            ParameterName::NumberOfWavelengths => ValueKind::Integer,
            _ => ValueKind::String,
        }
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a name outside the vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown parameter name: {0}")]
pub struct UnknownParameter(pub String);

impl FromStr for ParameterName {
    type Err = UnknownParameter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParameterName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownParameter(s.to_string()))
    }
}

/// Typed parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Text value
    String(String),
}

impl ParameterValue {
    /// Text payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Float payload
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer payload
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParameterValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Kind of the stored value
    pub fn kind(&self) -> ValueKind {
        match self {
            ParameterValue::String(_) => ValueKind::String,
            ParameterValue::Float(_) => ValueKind::Float,
            ParameterValue::Integer(_) => ValueKind::Integer,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::String(s) => f.write_str(s),
            ParameterValue::Float(v) => write!(f, "{v:?}"),
            ParameterValue::Integer(v) => write!(f, "{v}"),
        }
    }
}

/// Ordered set of extracted parameters for one file (or one section)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    values: BTreeMap<ParameterName, ParameterValue>,
}

impl ParameterSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the one it replaced
    pub fn insert(&mut self, name: ParameterName, value: ParameterValue) -> Option<ParameterValue> {
        self.values.insert(name, value)
    }

    /// Look up a value
    pub fn get(&self, name: ParameterName) -> Option<&ParameterValue> {
        self.values.get(&name)
    }

    /// Text value of a parameter
    pub fn get_str(&self, name: ParameterName) -> Option<&str> {
        self.get(name).and_then(ParameterValue::as_str)
    }

    /// Float value of a parameter
    pub fn get_f64(&self, name: ParameterName) -> Option<f64> {
        self.get(name).and_then(ParameterValue::as_f64)
    }

    /// Integer value of a parameter
    pub fn get_i64(&self, name: ParameterName) -> Option<i64> {
        self.get(name).and_then(ParameterValue::as_i64)
    }

    /// Whether the parameter is present
    pub fn contains(&self, name: ParameterName) -> bool {
        self.values.contains_key(&name)
    }

    /// Number of parameters present
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameter was extracted
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate in stream order
    pub fn iter(&self) -> impl Iterator<Item = (ParameterName, &ParameterValue)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }

    /// Fold `later` into `self`; values from `later` win on conflicts
    pub fn merge(&mut self, later: ParameterSet) {
        self.values.extend(later.values);
    }

    /// Serialize to a JSON object
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from a JSON object
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl IntoIterator for ParameterSet {
    type Item = (ParameterName, ParameterValue);
    type IntoIter = std::collections::btree_map::IntoIter<ParameterName, ParameterValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl FromIterator<(ParameterName, ParameterValue)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (ParameterName, ParameterValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip_through_str() {
        for name in ParameterName::ALL {
            assert_eq!(name.as_str().parse::<ParameterName>().unwrap(), name);
        }
        assert!("plate_read_time".parse::<ParameterName>().is_err());
    }

    #[test]
    fn test_serde_names_match_wire_names() {
        for name in ParameterName::ALL {
            let json = serde_json::to_string(&name).unwrap();
            assert_eq!(json, format!("\"{}\"", name.as_str()));
        }
    }

    #[test]
    fn test_declared_kinds() {
        assert_eq!(ParameterName::SoftmaxVersion.kind(), ValueKind::String);
        assert_eq!(ParameterName::KineticFlexInterval.kind(), ValueKind::Float);
        assert_eq!(ParameterName::NumberOfWavelengths.kind(), ValueKind::Integer);
        assert_eq!(ParameterName::NumberOfWellsOrCuvette.kind(), ValueKind::Float);
    }

    #[test]
    fn test_iteration_follows_stream_order() {
        let mut set = ParameterSet::new();
        set.insert(
            ParameterName::ExcitationWavelengths,
            ParameterValue::String("340 380".into()),
        );
        set.insert(
            ParameterName::SoftmaxVersion,
            ParameterValue::String("5.42.1.0".into()),
        );
        set.insert(ParameterName::KineticPoints, ParameterValue::Float(65.0));

        let names: Vec<_> = set.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec![
                ParameterName::SoftmaxVersion,
                ParameterName::KineticPoints,
                ParameterName::ExcitationWavelengths,
            ]
        );
    }

    #[test]
    fn test_merge_later_wins() {
        let mut first = ParameterSet::new();
        first.insert(ParameterName::ExperimentName, ParameterValue::String("A".into()));
        first.insert(ParameterName::Strips, ParameterValue::String("1-9".into()));

        let mut second = ParameterSet::new();
        second.insert(ParameterName::ExperimentName, ParameterValue::String("B".into()));

        first.merge(second);
        assert_eq!(first.get_str(ParameterName::ExperimentName), Some("B"));
        assert_eq!(first.get_str(ParameterName::Strips), Some("1-9"));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut set = ParameterSet::new();
        set.insert(ParameterName::SoftmaxVersion, ParameterValue::String("5.42.1.0".into()));
        set.insert(ParameterName::KineticPoints, ParameterValue::Float(65.0));
        set.insert(ParameterName::NumberOfWavelengths, ParameterValue::Integer(2));

        let json = set.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"softmax_version":"5.42.1.0","kinetic_points":65.0,"number_of_wavelengths":2}"#
        );

        let restored = ParameterSet::from_json(&json).unwrap();
        assert_eq!(restored, set);
    }
}
