//! Failure kinds reported by set checks.
//!
//! Every failure is terminal for the check that produced it. Messages are meant
//! for humans reading test output, so most variants carry a dump of the
//! resource's flat attributes.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::core::types::MatchRequest;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("Not found: {resource} in {module}")]
    ResourceNotFound { resource: String, module: String },

    #[error("No primary instance: {resource} in {module}")]
    NoPrimaryInstance { resource: String, module: String },

    #[error("{resource:?} {address:?} does not appear to be a TypeSet")]
    NotACollection { resource: String, address: String },

    #[error("{resource:?} {address:?} has a malformed set count {count:?}")]
    InvalidCount {
        resource: String,
        address: String,
        count: String,
    },

    #[error(
        "Expected the number of set items in {resource:?} {address:?} to be {expected}, got {actual}.\nState: {state}"
    )]
    CountMismatch {
        resource: String,
        address: String,
        expected: usize,
        actual: usize,
        state: StateDump,
    },

    #[error("{resource:?} {address:?} has no element with {request} in state: {state}")]
    NoMatchingElement {
        resource: String,
        address: String,
        request: MatchRequest,
        state: StateDump,
    },

    #[error("invalid address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },
}

impl CheckError {
    /// Drop the attribute dump from the message (large states drown the output).
    pub fn without_state(self) -> Self {
        match self {
            CheckError::CountMismatch {
                resource,
                address,
                expected,
                actual,
                ..
            } => CheckError::CountMismatch {
                resource,
                address,
                expected,
                actual,
                state: StateDump::Omitted,
            },
            CheckError::NoMatchingElement {
                resource,
                address,
                request,
                ..
            } => CheckError::NoMatchingElement {
                resource,
                address,
                request,
                state: StateDump::Omitted,
            },
            other => other,
        }
    }

    /// Short stable label for the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckError::ResourceNotFound { .. } => "resource_not_found",
            CheckError::NoPrimaryInstance { .. } => "no_primary_instance",
            CheckError::NotACollection { .. } => "not_a_collection",
            CheckError::InvalidCount { .. } => "invalid_count",
            CheckError::CountMismatch { .. } => "count_mismatch",
            CheckError::NoMatchingElement { .. } => "no_matching_element",
            CheckError::InvalidAddress { .. } => "invalid_address",
        }
    }
}

/// Flat attributes attached to a failure for diagnosis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateDump {
    Attributes(BTreeMap<String, String>),
    Omitted,
}

impl StateDump {
    pub fn of(attributes: &BTreeMap<String, String>) -> Self {
        StateDump::Attributes(attributes.clone())
    }
}

impl fmt::Display for StateDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateDump::Attributes(attributes) => write!(f, "{:?}", attributes),
            StateDump::Omitted => f.write_str("<omitted>"),
        }
    }
}
