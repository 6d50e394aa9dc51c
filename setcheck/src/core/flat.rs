//! Segment-split view over a flatmap attribute mapping.
//!
//! Flatmap keys arrive as dotted strings (`rules.0.ports.#`). They are split
//! into segments exactly once here so the resolvers never re-derive segment
//! boundaries from raw strings.

use std::collections::BTreeMap;

/// Segment naming the element count of a collection (`ports.#`).
pub const COUNT_MARKER: &str = "#";

/// Separator between flatmap key segments.
pub const SEPARATOR: char = '.';

/// One flatmap entry split into key segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatEntry<'a> {
    pub key: &'a str,
    pub segments: Vec<&'a str>,
    pub value: &'a str,
}

impl FlatEntry<'_> {
    /// True if this entry is the count marker of some collection.
    pub fn is_count_marker(&self) -> bool {
        self.segments.last() == Some(&COUNT_MARKER)
    }
}

/// Read-only, segment-split view of a resource's flat attributes.
///
/// Entries are kept in key order so scans are deterministic across runs.
#[derive(Debug, Clone)]
pub struct FlatState<'a> {
    attributes: &'a BTreeMap<String, String>,
    entries: Vec<FlatEntry<'a>>,
}

impl<'a> FlatState<'a> {
    pub fn new(attributes: &'a BTreeMap<String, String>) -> Self {
        let entries = attributes
            .iter()
            .map(|(key, value)| FlatEntry {
                key: key.as_str(),
                segments: key.split(SEPARATOR).collect(),
                value: value.as_str(),
            })
            .collect();
        Self {
            attributes,
            entries,
        }
    }

    pub fn entries(&self) -> &[FlatEntry<'a>] {
        &self.entries
    }

    /// Raw value stored at `key`, if any.
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Value of the count marker for the collection at `address`.
    pub fn count_marker(&self, address: &[&str]) -> Option<&'a str> {
        self.get(&count_marker_key(address))
    }

    /// Same attributes with the scan order reversed.
    #[cfg(test)]
    pub(crate) fn reversed(mut self) -> Self {
        self.entries.reverse();
        self
    }

    /// Underlying attribute mapping, used for diagnostic dumps.
    pub fn attributes(&self) -> &'a BTreeMap<String, String> {
        self.attributes
    }
}

/// Join segments back into a dotted flatmap key.
pub fn join(segments: &[&str]) -> String {
    segments.join(".")
}

/// Flatmap key of the count marker for the collection at `address`.
pub fn count_marker_key(address: &[&str]) -> String {
    format!("{}{}{}", join(address), SEPARATOR, COUNT_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::attrs;

    #[test]
    fn splits_keys_into_segments() {
        let attributes = attrs(&[("rules.0.ports.#", "1"), ("name", "web")]);
        let flat = FlatState::new(&attributes);

        let segments: Vec<Vec<&str>> = flat
            .entries()
            .iter()
            .map(|entry| entry.segments.clone())
            .collect();
        assert_eq!(segments, vec![vec!["name"], vec!["rules", "0", "ports", "#"]]);
        assert!(flat.entries()[1].is_count_marker());
        assert!(!flat.entries()[0].is_count_marker());
    }

    #[test]
    fn count_marker_looks_up_companion_key() {
        let attributes = attrs(&[("rules.0.ports.#", "2")]);
        let flat = FlatState::new(&attributes);
        assert_eq!(flat.count_marker(&["rules", "0", "ports"]), Some("2"));
        assert_eq!(flat.count_marker(&["rules", "0"]), None);
        assert_eq!(count_marker_key(&["rules", "0", "ports"]), "rules.0.ports.#");
    }
}
