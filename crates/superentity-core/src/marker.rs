//! Type markers attached to raw field options.

use serde_json::Value;
use std::fmt;

/// The type marker found on a raw field option.
///
/// Upstream markers are heterogeneous (class references, primitive literals,
/// arbitrary values), so decoding folds them into this closed set and never
/// fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeMarker {
    /// The string-primitive class marker.
    String,
    /// The numeric-primitive class marker.
    Number,
    /// The date class marker.
    Date,
    /// The boolean class marker. Recognized, but not a boolean kind on its
    /// own: only literal markers resolve to booleans.
    Boolean,
    /// A boolean literal used as the marker value.
    Literal(bool),
    /// Anything else, kept in textual form for diagnostics.
    Other(String),
}

impl TypeMarker {
    /// Decode a marker from its JSON form.
    ///
    /// Class markers are matched by exact name; booleans become `Literal`.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(name) => Self::from_name(name),
            Value::Bool(b) => TypeMarker::Literal(*b),
            other => TypeMarker::Other(other.to_string()),
        }
    }

    /// Decode a marker from a class name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "String" => TypeMarker::String,
            "Number" => TypeMarker::Number,
            "Date" => TypeMarker::Date,
            "Boolean" => TypeMarker::Boolean,
            other => TypeMarker::Other(other.to_string()),
        }
    }

    /// Whether this marker is a boolean literal.
    pub fn is_boolean_literal(&self) -> bool {
        matches!(self, TypeMarker::Literal(_))
    }
}

impl fmt::Display for TypeMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeMarker::String => f.write_str("String"),
            TypeMarker::Number => f.write_str("Number"),
            TypeMarker::Date => f.write_str("Date"),
            TypeMarker::Boolean => f.write_str("Boolean"),
            TypeMarker::Literal(b) => write!(f, "{}", b),
            TypeMarker::Other(s) => f.write_str(s),
        }
    }
}
