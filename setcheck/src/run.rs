//! Evaluation of check files for `setcheck run`.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::check::run_set_check;
use crate::core::types::MatchedElement;
use crate::error::CheckError;
use crate::io::check_file::CheckFile;
use crate::io::config::SetcheckConfig;
use crate::io::state_store::load_state;
use crate::state::StateAccessor;

/// Result of one declared check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub label: String,
    pub result: Result<MatchedElement, CheckError>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a check file run, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub outcomes: Vec<CheckOutcome>,
    /// Checks not evaluated because an earlier one failed under `fail_fast`.
    pub skipped: usize,
}

impl RunReport {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0 && self.skipped == 0
    }
}

/// Evaluate every check in `file` against `state`.
pub fn run_checks(
    state: &dyn StateAccessor,
    file: &CheckFile,
    cfg: &SetcheckConfig,
) -> Result<RunReport> {
    let mut report = RunReport::default();
    for (index, spec) in file.checks.iter().enumerate() {
        let address = spec
            .address()
            .with_context(|| format!("checks[{}] address", index))?;
        let result = run_set_check(state, &spec.resource, &address, &spec.request())
            .map_err(|err| if cfg.dump_state { err } else { err.without_state() });
        debug!(index, label = %spec.label(), passed = result.is_ok(), "check evaluated");
        let failed = result.is_err();
        report.outcomes.push(CheckOutcome {
            label: spec.label(),
            result,
        });
        if failed && cfg.fail_fast {
            report.skipped = file.checks.len() - index - 1;
            break;
        }
    }
    info!(
        passed = report.passed(),
        failed = report.failed(),
        skipped = report.skipped,
        "checks finished"
    );
    Ok(report)
}

/// Load the snapshot and check file from disk and evaluate them.
pub fn run_from_paths(
    state_path: &Path,
    checks_path: &Path,
    cfg: &SetcheckConfig,
) -> Result<RunReport> {
    let state = load_state(state_path).context("load state snapshot")?;
    let file = CheckFile::load(checks_path).context("load check file")?;
    run_checks(&state, &file, cfg)
}
