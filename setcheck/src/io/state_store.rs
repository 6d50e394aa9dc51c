//! Snapshot load/save helpers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::state::State;

/// Load a state snapshot from a JSON file.
pub fn load_state(path: &Path) -> Result<State> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read state {}", path.display()))?;
    let state: State = serde_json::from_str(&contents)
        .with_context(|| format!("parse state {}", path.display()))?;
    if state.root_module().is_none() {
        tracing::warn!(path = %path.display(), "state has no root module");
    }
    Ok(state)
}

/// Write a snapshot as pretty-printed JSON with trailing newline.
pub fn write_state(path: &Path, state: &State) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(state).context("serialize state json")?;
    buf.push('\n');
    fs::write(path, buf).with_context(|| format!("write state {}", path.display()))
}
