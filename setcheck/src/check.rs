//! Assertion functions over set attributes of a state snapshot.
//!
//! The `check_*` constructors build reusable [`Check`]s that a test suite can
//! run against each new snapshot; the plain functions evaluate once against a
//! snapshot already in hand.
//!
//! Use these over plain attribute checks when asserting on a set: set element
//! ids are synthetic, so the flat key of a given element is not known in
//! advance. When matching nested attributes, pass enough pairs to single out
//! the intended element. The first element carrying every requested pair
//! satisfies the check, even if other elements would too.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::core::address::Address;
use crate::core::flat::FlatState;
use crate::core::matcher::match_set;
use crate::core::types::{MatchRequest, MatchedElement};
use crate::error::CheckError;
use crate::state::{ResourceLookup, StateAccessor};

type CheckFn = dyn Fn(&dyn StateAccessor) -> Result<(), CheckError> + Send + Sync;

/// A reusable assertion against a state snapshot.
pub struct Check {
    description: String,
    func: Box<CheckFn>,
}

impl Check {
    pub fn new<F>(description: impl Into<String>, func: F) -> Self
    where
        F: Fn(&dyn StateAccessor) -> Result<(), CheckError> + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            func: Box::new(func),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn run(&self, state: &dyn StateAccessor) -> Result<(), CheckError> {
        (self.func)(state)
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Failure of one check within a composed sequence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Check {index}/{total} error: {source}")]
pub struct ComposedError {
    /// 1-based position of the failing check.
    pub index: usize,
    pub total: usize,
    pub source: CheckError,
}

/// Run `checks` in order, stopping at the first failure.
pub fn compose_checks(checks: &[Check], state: &dyn StateAccessor) -> Result<(), ComposedError> {
    let total = checks.len();
    for (offset, check) in checks.iter().enumerate() {
        debug!(index = offset + 1, total, check = check.description(), "running check");
        check.run(state).map_err(|source| ComposedError {
            index: offset + 1,
            total,
            source,
        })?;
    }
    Ok(())
}

/// Check that the set at `address` on `resource` contains `value`.
pub fn check_set_elem_attr(
    resource: impl Into<String>,
    address: Address,
    value: impl Into<String>,
) -> Check {
    let resource = resource.into();
    let value = value.into();
    let description = format!("{resource} {address} contains {value:?}");
    Check::new(description, move |state| {
        set_elem_attr(state, &resource, &address, &value).map(|_| ())
    })
}

/// Check that the set at `address` on `resource` has an element carrying
/// every pair in `values`.
pub fn check_set_elem_nested_attrs(
    resource: impl Into<String>,
    address: Address,
    values: BTreeMap<String, String>,
) -> Check {
    let resource = resource.into();
    let description = format!("{resource} {address} contains element {values:?}");
    Check::new(description, move |state| {
        set_elem_nested_attrs(state, &resource, &address, &values).map(|_| ())
    })
}

pub fn set_elem_attr(
    state: &dyn StateAccessor,
    resource: &str,
    address: &Address,
    value: &str,
) -> Result<MatchedElement, CheckError> {
    run_set_check(
        state,
        resource,
        address,
        &MatchRequest::Value(value.to_string()),
    )
}

pub fn set_elem_nested_attrs(
    state: &dyn StateAccessor,
    resource: &str,
    address: &Address,
    values: &BTreeMap<String, String>,
) -> Result<MatchedElement, CheckError> {
    run_set_check(
        state,
        resource,
        address,
        &MatchRequest::Attrs(values.clone()),
    )
}

/// Look up `resource` and match `request` against the set at `address`.
pub fn run_set_check(
    state: &dyn StateAccessor,
    resource: &str,
    address: &Address,
    request: &MatchRequest,
) -> Result<MatchedElement, CheckError> {
    let attributes = primary_attributes(state, resource)?;
    debug!(resource, attributes = attributes.len(), "resource attributes loaded");
    let flat = FlatState::new(attributes);
    match_set(resource, &flat, address, request)
}

/// Flat attributes of `resource`'s primary instance.
fn primary_attributes<'s>(
    state: &'s dyn StateAccessor,
    resource: &str,
) -> Result<&'s BTreeMap<String, String>, CheckError> {
    match state.lookup(resource) {
        ResourceLookup::Primary(attributes) => Ok(attributes),
        ResourceLookup::Missing => Err(CheckError::ResourceNotFound {
            resource: resource.to_string(),
            module: state.module_path(),
        }),
        ResourceLookup::NoPrimary => Err(CheckError::NoPrimaryInstance {
            resource: resource.to_string(),
            module: state.module_path(),
        }),
    }
}
