//! Deterministic, pure matching logic.
//!
//! Core modules must be free of I/O side effects. They operate on borrowed
//! flat attributes and return deterministic outputs suitable for tests.

pub mod address;
pub mod flat;
pub mod group;
pub mod matcher;
pub mod types;
