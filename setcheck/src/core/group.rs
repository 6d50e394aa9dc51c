//! Reconstruction of set elements from flat keys.
//!
//! Flattening assigns each set element a synthetic id (`ingress.2148.port`).
//! Grouping collects every key sharing a collection and id back into one
//! element, keyed by its nested attribute path (`port`).

use std::collections::BTreeMap;

use tracing::trace;

use crate::core::address::Address;
use crate::core::flat::{FlatState, join};

/// One reconstructed set element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementGroup<'f> {
    pub id: &'f str,
    /// Nested attribute path (dotted, empty for primitive elements) to value.
    pub attributes: BTreeMap<String, &'f str>,
}

/// All elements found under one collection address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection<'f> {
    pub address: Vec<&'f str>,
    pub elements: BTreeMap<&'f str, ElementGroup<'f>>,
}

impl Collection<'_> {
    pub fn dotted(&self) -> String {
        join(&self.address)
    }
}

/// Group every key resolved by `address` into per-collection elements.
///
/// Collections whose only key is the count marker are still returned, with no
/// elements, so an empty set can be told apart from a missing one.
pub fn group_elements<'f>(flat: &'f FlatState<'_>, address: &Address) -> Vec<Collection<'f>> {
    let mut collections: BTreeMap<&'f [&'f str], Collection<'f>> = BTreeMap::new();
    for entry in flat.entries() {
        let Some(located) = address.resolve(entry) else {
            continue;
        };
        let collection = collections
            .entry(located.collection)
            .or_insert_with(|| Collection {
                address: located.collection.to_vec(),
                elements: BTreeMap::new(),
            });
        if located.is_count_marker() {
            continue;
        }
        let element = collection
            .elements
            .entry(located.id)
            .or_insert_with(|| ElementGroup {
                id: located.id,
                attributes: BTreeMap::new(),
            });
        let path = join(located.remainder);
        trace!(key = entry.key, id = located.id, path = %path, "grouped flat key");
        element.attributes.insert(path, entry.value);
    }
    collections.into_values().collect()
}
