//! Check file parsing and validation.
//!
//! Check files are TOML documents listing set assertions to evaluate against
//! a state snapshot:
//!
//! ```toml
//! [[checks]]
//! type = "set_elem_attr"
//! resource = "aws_security_group.web"
//! key = "ports"
//! value = "443"
//!
//! [[checks]]
//! type = "set_elem_nested_attrs"
//! resource = "aws_lb_listener.main"
//! attr = "rule"
//! depth = 3
//! under = "policy.0"
//! values = { name = "allow", port = "80" }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::core::address::Address;
use crate::core::types::MatchRequest;

/// A parsed check file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CheckFile {
    #[serde(default)]
    pub checks: Vec<CheckSpec>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Set of primitives contains `value`.
    SetElemAttr,
    /// Set of objects has an element carrying every pair in `values`.
    SetElemNestedAttrs,
}

/// One declared check.
///
/// The target is either a literal `key`, or an `attr` at `depth` optionally
/// anchored `under` a dotted prefix.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CheckSpec {
    #[serde(rename = "type")]
    pub kind: CheckKind,
    /// Optional label used in reports instead of the generated description.
    pub name: Option<String>,
    pub resource: String,
    pub key: Option<String>,
    pub attr: Option<String>,
    pub depth: Option<usize>,
    pub under: Option<String>,
    pub value: Option<String>,
    pub values: Option<BTreeMap<String, String>>,
}

impl CheckFile {
    /// Load and validate a check file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read checks {}", path.display()))?;
        Self::parse_str(&contents).with_context(|| format!("load checks {}", path.display()))
    }

    pub fn parse_str(contents: &str) -> Result<Self> {
        let file: CheckFile = toml::from_str(contents).context("parse checks")?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> Result<()> {
        if self.checks.is_empty() {
            bail!("checks must be a non-empty array");
        }
        for (index, check) in self.checks.iter().enumerate() {
            check
                .validate()
                .with_context(|| format!("checks[{}] invalid", index))?;
        }
        Ok(())
    }
}

impl CheckSpec {
    fn validate(&self) -> Result<()> {
        if self.resource.trim().is_empty() {
            bail!("resource must be non-empty");
        }
        let address = self.address()?;
        address.validate()?;
        match self.kind {
            CheckKind::SetElemAttr => {
                if self.value.is_none() {
                    bail!("set_elem_attr requires value");
                }
                if self.values.is_some() {
                    bail!("set_elem_attr takes value, not values");
                }
            }
            CheckKind::SetElemNestedAttrs => {
                match &self.values {
                    None => bail!("set_elem_nested_attrs requires values"),
                    Some(values) if values.is_empty() => {
                        bail!("set_elem_nested_attrs.values must be non-empty")
                    }
                    Some(_) => {}
                }
                if self.value.is_some() {
                    bail!("set_elem_nested_attrs takes values, not value");
                }
            }
        }
        Ok(())
    }

    /// Target address described by `key` or `attr` + `depth` (+ `under`).
    pub fn address(&self) -> Result<Address> {
        match (&self.key, &self.attr, self.depth) {
            (Some(key), None, None) => {
                if self.under.is_some() {
                    bail!("under only applies to attr/depth targets");
                }
                Ok(Address::literal(key))
            }
            (None, Some(attr), Some(depth)) => {
                let address = Address::depth(attr, depth);
                Ok(match &self.under {
                    Some(prefix) => address.under(prefix),
                    None => address,
                })
            }
            (None, Some(_), None) => bail!("attr requires depth"),
            (None, None, Some(_)) => bail!("depth requires attr"),
            (None, None, None) => bail!("one of key or attr/depth is required"),
            _ => bail!("key cannot be combined with attr/depth"),
        }
    }

    pub fn request(&self) -> MatchRequest {
        match self.kind {
            CheckKind::SetElemAttr => MatchRequest::Value(self.value.clone().unwrap_or_default()),
            CheckKind::SetElemNestedAttrs => {
                MatchRequest::Attrs(self.values.clone().unwrap_or_default())
            }
        }
    }

    /// Label for reports.
    pub fn label(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        let target = match self.address() {
            Ok(address) => address.to_string(),
            Err(_) => "<invalid address>".to_string(),
        };
        format!("{} {} {}", self.resource, target, self.request())
    }
}
