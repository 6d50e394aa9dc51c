//! Test-only helpers for constructing flat attributes and state snapshots.

use std::collections::BTreeMap;

use crate::state::{InstanceState, ResourceState, State};

/// Build a flat attribute map from `(key, value)` pairs.
pub fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Build a nested-match request map from `(attribute, value)` pairs.
pub fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    attrs(pairs)
}

/// Fluent builder for snapshots with resources in the root module.
#[derive(Debug, Default)]
pub struct StateBuilder {
    state: State,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            state: State::new(),
        }
    }

    /// Add a resource whose primary instance carries `pairs`.
    pub fn resource(mut self, name: &str, pairs: &[(&str, &str)]) -> Self {
        let kind = name.split('.').next().unwrap_or_default().to_string();
        self.state.root_module_mut().resources.insert(
            name.to_string(),
            ResourceState {
                kind,
                primary: Some(InstanceState {
                    id: format!("{}-id", name),
                    attributes: attrs(pairs),
                }),
            },
        );
        self
    }

    /// Add a resource that has no primary instance yet.
    pub fn resource_without_primary(mut self, name: &str) -> Self {
        self.state
            .root_module_mut()
            .resources
            .insert(name.to_string(), ResourceState::default());
        self
    }

    pub fn build(self) -> State {
        self.state
    }
}
