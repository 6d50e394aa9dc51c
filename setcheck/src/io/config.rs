//! Tool configuration stored in `setcheck.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "setcheck.toml";

/// Setcheck configuration (TOML).
///
/// Missing fields default to the values below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SetcheckConfig {
    /// Include the resource's flat attributes in failure messages.
    pub dump_state: bool,

    /// Stop a check file run at the first failing check.
    pub fail_fast: bool,
}

impl Default for SetcheckConfig {
    fn default() -> Self {
        Self {
            dump_state: true,
            fail_fast: false,
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `SetcheckConfig::default()`.
pub fn load_config(path: &Path) -> Result<SetcheckConfig> {
    if !path.exists() {
        return Ok(SetcheckConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: SetcheckConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
