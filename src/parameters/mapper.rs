//! Token → typed parameter mapping.

use log::trace;

use super::{ParameterName, ParameterSet, ParameterValue, ValueKind};
use crate::tokens::{Token, TokenValue};

/// Maps raw tokens onto the parameter vocabulary with type coercion.
///
/// Every token maps to one value. Text declared numeric that does not parse
/// to a finite number is kept as text. `map` leaves out non-finite floats,
/// which have no JSON representation.
pub struct ParameterMapper;

impl ParameterMapper {
    /// Coerce one token to the declared kind of `name`
    pub fn coerce(name: ParameterName, token: Token) -> ParameterValue {
        match (name.kind(), token.value) {
            (ValueKind::String, TokenValue::Text(text)) => ParameterValue::String(text),
            (ValueKind::String, TokenValue::Float(v)) => ParameterValue::String(format!("{v}")),
            (ValueKind::String, TokenValue::Integer(v)) => ParameterValue::String(v.to_string()),
            (ValueKind::Float, TokenValue::Float(v)) => ParameterValue::Float(v),
            (ValueKind::Float, TokenValue::Integer(v)) => ParameterValue::Float(v as f64),
            (ValueKind::Float, TokenValue::Text(text)) => match text.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => ParameterValue::Float(v),
                _ => ParameterValue::String(text),
            },
            (ValueKind::Integer, TokenValue::Integer(v)) => ParameterValue::Integer(v),
            (ValueKind::Integer, TokenValue::Float(v)) if v.is_finite() => {
                ParameterValue::Integer(v as i64)
            }
            (ValueKind::Integer, TokenValue::Float(v)) => ParameterValue::Float(v),
            (ValueKind::Integer, TokenValue::Text(text)) => match text.trim().parse::<i64>() {
                Ok(v) => ParameterValue::Integer(v),
                Err(_) => ParameterValue::String(text),
            },
        }
    }

    /// Build a parameter set from fields in stream order; later duplicates win
    pub fn map<I>(fields: I) -> ParameterSet
    where
        I: IntoIterator<Item = (ParameterName, Token)>,
    {
        let mut set = ParameterSet::new();
        for (name, token) in fields {
            trace!("{} @ {}", name, token.offset);
            match Self::coerce(name, token) {
                ParameterValue::Float(v) if !v.is_finite() => trace!("{name}: skipped {v}"),
                value => {
                    set.insert(name, value);
                }
            }
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_passes_through_unchanged() {
        let value = ParameterMapper::coerce(
            ParameterName::AnalysisNotes,
            Token::text(0, "Notes#1: a\rb \u{b5}"),
        );
        assert_eq!(value, ParameterValue::String("Notes#1: a\rb \u{b5}".into()));
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(
            ParameterMapper::coerce(ParameterName::NumberOfWellsOrCuvette, Token::integer(0, 96)),
            ParameterValue::Float(96.0)
        );
        assert_eq!(
            ParameterMapper::coerce(ParameterName::NumberOfWavelengths, Token::float(0, 2.0)),
            ParameterValue::Integer(2)
        );
        assert_eq!(
            ParameterMapper::coerce(ParameterName::KineticFlexInterval, Token::text(0, " 3.9")),
            ParameterValue::Float(3.9)
        );
    }

    #[test]
    fn test_unparseable_numeric_text_is_kept() {
        assert_eq!(
            ParameterMapper::coerce(ParameterName::KineticPoints, Token::text(0, "n/a")),
            ParameterValue::String("n/a".into())
        );
    }

    #[test]
    fn test_map_is_total_and_ordered() {
        let fields = vec![
            (ParameterName::ExperimentName, Token::text(10, "Exp01")),
            (ParameterName::SoftmaxVersion, Token::text(2, "5.42.1.0")),
            (ParameterName::KineticPoints, Token::float(40, 39.0)),
        ];
        let set = ParameterMapper::map(fields);

        assert_eq!(set.len(), 3);
        assert_eq!(set.get_str(ParameterName::SoftmaxVersion), Some("5.42.1.0"));
        assert_eq!(set.get_f64(ParameterName::KineticPoints), Some(39.0));
        assert_eq!(set.iter().next().map(|(n, _)| n), Some(ParameterName::SoftmaxVersion));
    }

    #[test]
    fn test_map_empty() {
        assert!(ParameterMapper::map(Vec::<(ParameterName, Token)>::new()).is_empty());
    }

    #[test]
    fn test_non_finite_floats_never_reach_the_set() {
        let fields = vec![
            (ParameterName::KineticPoints, Token::float(40, f64::NAN)),
            (ParameterName::KineticFlexReadTime, Token::text(48, "inf")),
            (ParameterName::NumberOfWavelengths, Token::float(64, f64::INFINITY)),
            (ParameterName::KineticFlexInterval, Token::float(56, 3.9)),
        ];
        let set = ParameterMapper::map(fields);

        assert!(!set.contains(ParameterName::KineticPoints));
        assert!(!set.contains(ParameterName::NumberOfWavelengths));
        assert_eq!(
            set.get(ParameterName::KineticFlexReadTime),
            Some(&ParameterValue::String("inf".into()))
        );
        assert_eq!(set.get_f64(ParameterName::KineticFlexInterval), Some(3.9));
        assert!(!set.to_json().unwrap().contains("null"));
    }
}
