//! State snapshot handed to checks by the provisioning framework.
//!
//! Only the parts checks read are modelled: modules, their resources and each
//! resource's primary instance with its flat attributes. Unknown fields in a
//! snapshot file are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Path of the root module.
pub const ROOT_MODULE: &str = "root";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct State {
    #[serde(default)]
    pub modules: Vec<ModuleState>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleState {
    pub path: Vec<String>,
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceState>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceState {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub primary: Option<InstanceState>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceState {
    #[serde(default)]
    pub id: String,
    /// Flatmap attributes (`ports.#`, `ports.0`, ...).
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

/// Result of looking a resource up by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceLookup<'s> {
    Missing,
    NoPrimary,
    Primary(&'s BTreeMap<String, String>),
}

/// Read access to resource attributes keyed by resource name.
///
/// Checks only ever read through this trait, so any snapshot source can back
/// them.
pub trait StateAccessor {
    /// Human-readable path of the module resources are looked up in.
    fn module_path(&self) -> String;

    fn lookup(&self, resource: &str) -> ResourceLookup<'_>;
}

impl State {
    /// Snapshot with a single, empty root module.
    pub fn new() -> Self {
        Self {
            modules: vec![ModuleState::root()],
        }
    }

    pub fn root_module(&self) -> Option<&ModuleState> {
        self.modules.iter().find(|module| module.is_root())
    }

    /// Root module, created on first use.
    pub fn root_module_mut(&mut self) -> &mut ModuleState {
        let index = match self.modules.iter().position(ModuleState::is_root) {
            Some(index) => index,
            None => {
                self.modules.push(ModuleState::root());
                self.modules.len() - 1
            }
        };
        &mut self.modules[index]
    }
}

impl ModuleState {
    pub fn root() -> Self {
        Self {
            path: vec![ROOT_MODULE.to_string()],
            resources: BTreeMap::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.path.len() == 1 && self.path[0] == ROOT_MODULE
    }
}

impl StateAccessor for ModuleState {
    fn module_path(&self) -> String {
        self.path.join(".")
    }

    fn lookup(&self, resource: &str) -> ResourceLookup<'_> {
        match self.resources.get(resource) {
            None => ResourceLookup::Missing,
            Some(ResourceState { primary: None, .. }) => ResourceLookup::NoPrimary,
            Some(ResourceState {
                primary: Some(instance),
                ..
            }) => ResourceLookup::Primary(&instance.attributes),
        }
    }
}

/// Lookups on a snapshot go to its root module.
impl StateAccessor for State {
    fn module_path(&self) -> String {
        ROOT_MODULE.to_string()
    }

    fn lookup(&self, resource: &str) -> ResourceLookup<'_> {
        match self.root_module() {
            Some(module) => module.lookup(resource),
            None => ResourceLookup::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StateBuilder, attrs};

    #[test]
    fn lookup_distinguishes_missing_and_no_primary() {
        let state = StateBuilder::new()
            .resource("aws_vpc.main", &[("cidr_block", "10.0.0.0/16")])
            .resource_without_primary("aws_vpc.pending")
            .build();

        assert_eq!(state.lookup("aws_vpc.other"), ResourceLookup::Missing);
        assert_eq!(state.lookup("aws_vpc.pending"), ResourceLookup::NoPrimary);
        let expected = attrs(&[("cidr_block", "10.0.0.0/16")]);
        assert_eq!(
            state.lookup("aws_vpc.main"),
            ResourceLookup::Primary(&expected)
        );
    }

    #[test]
    fn lookup_ignores_child_modules() {
        let mut state = StateBuilder::new().build();
        let mut child = ModuleState::root();
        child.path = vec!["root".to_string(), "network".to_string()];
        child
            .resources
            .insert("aws_vpc.main".to_string(), ResourceState::default());
        state.modules.push(child);

        assert_eq!(state.lookup("aws_vpc.main"), ResourceLookup::Missing);
    }

    #[test]
    fn deserializes_snapshot_json() {
        let raw = r#"{
            "version": 3,
            "modules": [{
                "path": ["root"],
                "resources": {
                    "aws_security_group.web": {
                        "type": "aws_security_group",
                        "primary": {
                            "id": "sg-123",
                            "attributes": {"ingress.#": "1", "ingress.42.from_port": "443"}
                        }
                    }
                }
            }]
        }"#;
        let state: State = serde_json::from_str(raw).expect("parse");
        let module = state.root_module().expect("root module");
        let resource = &module.resources["aws_security_group.web"];
        assert_eq!(resource.kind, "aws_security_group");
        assert_eq!(
            resource.primary.as_ref().expect("primary").attributes["ingress.42.from_port"],
            "443"
        );
    }
}
