//! Assertions over set attributes in flattened resource state.
//!
//! Provisioning frameworks store resource attributes as a flat map of dotted
//! keys (`ingress.2148.from_port`). Sets are flattened with synthetic element
//! ids, so tests cannot name an element's key up front. This crate rebuilds
//! set elements from the flat keys and checks whether any element matches a
//! value or a group of nested attribute/value pairs.
//!
//! - **[`core`]**: Pure matching logic (address resolution, grouping,
//!   evaluation). No I/O.
//! - **[`check`]**: Public assertion functions over a [`state::State`]
//!   snapshot.
//! - **[`io`]**: Snapshot files, check files and configuration.
//!
//! [`run`] evaluates whole check files for the `setcheck` CLI.

pub mod check;
pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod run;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crate::check::{
    Check, check_set_elem_attr, check_set_elem_nested_attrs, compose_checks, set_elem_attr,
    set_elem_nested_attrs,
};
pub use crate::core::address::Address;
pub use crate::error::CheckError;
pub use crate::state::{State, StateAccessor};
