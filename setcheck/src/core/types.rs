//! Shared deterministic types for the set matcher.

use std::collections::BTreeMap;
use std::fmt;

/// What an element of the target set must look like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchRequest {
    /// Element is a primitive equal to this value.
    Value(String),
    /// Element is an object carrying every one of these attribute/value pairs.
    ///
    /// Attributes present on the element but absent here are ignored.
    Attrs(BTreeMap<String, String>),
}

impl MatchRequest {
    pub fn is_nested(&self) -> bool {
        matches!(self, MatchRequest::Attrs(_))
    }
}

impl fmt::Display for MatchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchRequest::Value(value) => write!(f, "value: {:?}", value),
            MatchRequest::Attrs(values) => write!(f, "attr/value pairs: {:?}", values),
        }
    }
}

/// Outcome of a successful match, for logging and reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedElement {
    /// Dotted address of the collection the element belongs to.
    pub collection: String,
    /// Synthetic identifier assigned when the set was flattened.
    pub id: String,
}
