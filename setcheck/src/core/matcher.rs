//! Set element matching over a resource's flat attributes.
//!
//! Every check runs the same single pass: validate the address, locate or
//! group elements, then evaluate the request. Nothing is retried and the flat
//! state is never modified.
//!
//! A collection only counts as a set when it carries a count marker. A match
//! found in a collection without one is reported as not being a set; such a
//! collection is otherwise ignored, so a same-named map next to a real set
//! does not hide matches in the set.

use std::collections::BTreeMap;

use tracing::{debug, instrument, trace};

use crate::core::address::Address;
use crate::core::flat::{FlatState, join};
use crate::core::group::{Collection, group_elements};
use crate::core::types::{MatchRequest, MatchedElement};
use crate::error::{CheckError, StateDump};

/// Result of scanning every collection an address resolves into.
#[derive(Debug, Default)]
struct Scan {
    /// First match inside a collection with a count marker.
    matched: Option<MatchedElement>,
    /// First collection, in key order, holding a match but no count marker.
    unmarked_match: Option<String>,
    /// Whether any collection with a count marker was located.
    located_set: bool,
}

/// Find an element of the set at `address` satisfying `request`.
///
/// `resource` only labels error messages.
#[instrument(skip_all, fields(resource = %resource, address = %address, nested = request.is_nested()))]
pub fn match_set(
    resource: &str,
    flat: &FlatState<'_>,
    address: &Address,
    request: &MatchRequest,
) -> Result<MatchedElement, CheckError> {
    address.validate()?;
    let not_a_collection = |dotted: String| CheckError::NotACollection {
        resource: resource.to_string(),
        address: dotted,
    };

    if let Some(collection) = address.fixed_collection()
        && flat.count_marker(&collection).is_none()
    {
        return Err(not_a_collection(join(&collection)));
    }

    let scan = match request {
        MatchRequest::Value(value) => scan_values(flat, address, value),
        MatchRequest::Attrs(values) => {
            let (sets, unmarked): (Vec<Collection<'_>>, Vec<Collection<'_>>) =
                group_elements(flat, address)
                    .into_iter()
                    .partition(|collection| flat.count_marker(&collection.address).is_some());
            check_counts(resource, flat, &sets)?;
            Scan {
                matched: find_nested(&sets, values),
                unmarked_match: find_nested(&unmarked, values).map(|found| found.collection),
                located_set: !sets.is_empty(),
            }
        }
    };

    if let Some(matched) = scan.matched {
        debug!(collection = %matched.collection, id = %matched.id, "set element matched");
        return Ok(matched);
    }
    if let Some(dotted) = scan.unmarked_match {
        return Err(not_a_collection(dotted));
    }
    if !scan.located_set {
        return Err(not_a_collection(address.to_string()));
    }
    Err(CheckError::NoMatchingElement {
        resource: resource.to_string(),
        address: address.to_string(),
        request: request.clone(),
        state: StateDump::of(flat.attributes()),
    })
}

/// The number of reconstructed elements must equal each set's count marker.
fn check_counts(
    resource: &str,
    flat: &FlatState<'_>,
    collections: &[Collection<'_>],
) -> Result<(), CheckError> {
    for collection in collections {
        let raw = flat.count_marker(&collection.address).unwrap_or_default();
        let expected: usize = raw.parse().map_err(|_| CheckError::InvalidCount {
            resource: resource.to_string(),
            address: collection.dotted(),
            count: raw.to_string(),
        })?;
        let actual = collection.elements.len();
        if actual != expected {
            return Err(CheckError::CountMismatch {
                resource: resource.to_string(),
                address: collection.dotted(),
                expected,
                actual,
                state: StateDump::of(flat.attributes()),
            });
        }
    }
    Ok(())
}

/// Look for a primitive element equal to `value`, stopping at the first one
/// inside a set.
///
/// Only keys directly below the collection count; the count marker itself is
/// never an element.
fn scan_values(flat: &FlatState<'_>, address: &Address, value: &str) -> Scan {
    let mut scan = Scan::default();
    for entry in flat.entries() {
        let Some(located) = address.resolve(entry) else {
            continue;
        };
        let is_set = flat.count_marker(located.collection).is_some();
        scan.located_set |= is_set;
        if located.is_count_marker() || !located.remainder.is_empty() || entry.value != value {
            continue;
        }
        if is_set {
            scan.matched = Some(MatchedElement {
                collection: join(located.collection),
                id: located.id.to_string(),
            });
            break;
        }
        if scan.unmarked_match.is_none() {
            scan.unmarked_match = Some(join(located.collection));
        }
    }
    scan
}

/// First element carrying every requested attribute/value pair.
fn find_nested(
    collections: &[Collection<'_>],
    values: &BTreeMap<String, String>,
) -> Option<MatchedElement> {
    for collection in collections {
        for element in collection.elements.values() {
            let matches = values
                .iter()
                .filter(|(path, expected)| {
                    element.attributes.get(path.as_str()) == Some(&expected.as_str())
                })
                .count();
            trace!(id = element.id, matches, wanted = values.len(), "evaluated element");
            if matches == values.len() {
                return Some(MatchedElement {
                    collection: collection.dotted(),
                    id: element.id.to_string(),
                });
            }
        }
    }
    None
}
