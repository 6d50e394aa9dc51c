//! Target addresses and their resolution against flatmap keys.
//!
//! Two addressing schemes are supported:
//!
//! - **Literal**: the full dotted path of the set (`rules.0.ports`).
//! - **Depth**: the set's attribute name plus its 1-based segment depth
//!   (`ports` at depth 3), optionally anchored under a dotted prefix
//!   (`rules.0`). Useful when a parent list index is unknown or irrelevant.
//!
//! Both schemes resolve a flat key into the same [`Located`] triple, so
//! grouping and matching never care which scheme produced it.

use std::fmt;

use crate::core::flat::{COUNT_MARKER, FlatEntry, SEPARATOR};
use crate::error::CheckError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    Literal(Vec<String>),
    Depth {
        attr: String,
        depth: usize,
        under: Vec<String>,
    },
}

/// A flat key resolved against an [`Address`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located<'e> {
    /// Segments of the collection the key belongs to.
    pub collection: &'e [&'e str],
    /// Segment directly after the collection: an element id, or `#`.
    pub id: &'e str,
    /// Segments after the id (nested attribute path within the element).
    pub remainder: &'e [&'e str],
}

impl Located<'_> {
    /// True if the key is the collection's own count marker.
    pub fn is_count_marker(&self) -> bool {
        self.id == COUNT_MARKER && self.remainder.is_empty()
    }
}

impl Address {
    /// Literal dotted address, e.g. `"rules.0.ports"`.
    pub fn literal(key: &str) -> Self {
        Address::Literal(split(key))
    }

    /// Attribute `attr` expected at segment depth `depth` (1-based).
    pub fn depth(attr: &str, depth: usize) -> Self {
        Address::Depth {
            attr: attr.to_string(),
            depth,
            under: Vec::new(),
        }
    }

    /// Restrict a depth address to keys below the dotted `prefix`.
    ///
    /// Has no effect on literal addresses.
    pub fn under(self, prefix: &str) -> Self {
        match self {
            Address::Depth { attr, depth, .. } => Address::Depth {
                attr,
                depth,
                under: split(prefix),
            },
            literal => literal,
        }
    }

    /// Reject addresses that can never resolve a key.
    pub fn validate(&self) -> Result<(), CheckError> {
        let invalid = |reason: &str| CheckError::InvalidAddress {
            address: self.to_string(),
            reason: reason.to_string(),
        };
        match self {
            Address::Literal(segments) => {
                if segments.is_empty() {
                    return Err(invalid("address must not be empty"));
                }
                if segments.iter().any(|segment| segment.is_empty()) {
                    return Err(invalid("address must not contain empty segments"));
                }
                if segments.last().map(String::as_str) == Some(COUNT_MARKER) {
                    return Err(invalid("address must name the set, not its count"));
                }
            }
            Address::Depth { attr, depth, under } => {
                if attr.is_empty() || attr.contains(SEPARATOR) {
                    return Err(invalid("attribute must be a single non-empty segment"));
                }
                if attr == COUNT_MARKER {
                    return Err(invalid("attribute must name the set, not its count"));
                }
                if *depth == 0 {
                    return Err(invalid("depth must be >= 1"));
                }
                if under.len() >= *depth {
                    return Err(invalid("anchor must be shorter than depth"));
                }
                if under.iter().any(|segment| segment.is_empty()) {
                    return Err(invalid("anchor must not contain empty segments"));
                }
            }
        }
        Ok(())
    }

    /// Collection segments when they are known without scanning.
    pub fn fixed_collection(&self) -> Option<Vec<&str>> {
        match self {
            Address::Literal(segments) => Some(segments.iter().map(String::as_str).collect()),
            Address::Depth { .. } => None,
        }
    }

    /// Resolve a flat entry into (collection, id, remainder), if it lies
    /// inside a collection this address denotes.
    pub fn resolve<'e>(&self, entry: &'e FlatEntry<'_>) -> Option<Located<'e>> {
        let segments: &'e [&str] = &entry.segments;
        let split_at = match self {
            Address::Literal(address) => {
                if segments.len() <= address.len() || !has_prefix(segments, address) {
                    return None;
                }
                address.len()
            }
            Address::Depth { attr, depth, under } => {
                let depth = *depth;
                if depth == 0 || segments.len() <= depth {
                    return None;
                }
                if segments[depth - 1] != attr.as_str() || !has_prefix(segments, under) {
                    return None;
                }
                depth
            }
        };
        Some(Located {
            collection: &segments[..split_at],
            id: segments[split_at],
            remainder: &segments[split_at + 1..],
        })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Literal(segments) => f.write_str(&segments.join(".")),
            Address::Depth { attr, depth, under } if under.is_empty() => {
                write!(f, "{} at depth {}", attr, depth)
            }
            Address::Depth { attr, depth, under } => {
                write!(f, "{} at depth {} under {}", attr, depth, under.join("."))
            }
        }
    }
}

fn split(dotted: &str) -> Vec<String> {
    if dotted.is_empty() {
        return Vec::new();
    }
    dotted.split(SEPARATOR).map(str::to_string).collect()
}

fn has_prefix(segments: &[&str], prefix: &[String]) -> bool {
    prefix.len() <= segments.len()
        && segments
            .iter()
            .zip(prefix)
            .all(|(segment, expected)| *segment == expected.as_str())
}
