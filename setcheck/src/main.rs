//! Set element checks against a state snapshot file.
//!
//! Evaluates either a TOML check file (`run`) or a single check given on the
//! command line (`elem`, `nested`). Exit codes are listed in
//! [`setcheck::exit_codes`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use setcheck::check::run_set_check;
use setcheck::core::types::MatchRequest;
use setcheck::exit_codes;
use setcheck::io::config::{CONFIG_FILE, SetcheckConfig, load_config};
use setcheck::io::state_store::load_state;
use setcheck::run::{RunReport, run_from_paths};
use setcheck::{Address, logging};

#[derive(Parser)]
#[command(
    name = "setcheck",
    version,
    about = "Assert on set attributes in flattened resource state"
)]
struct Cli {
    /// Config file (defaults to `setcheck.toml` in the working directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate every check in a TOML check file.
    Run {
        /// State snapshot (JSON).
        #[arg(long)]
        state: PathBuf,
        /// Check file (TOML).
        #[arg(long)]
        checks: PathBuf,
    },
    /// Check that a set of primitives contains a value.
    Elem {
        #[command(flatten)]
        target: TargetArgs,
        /// Expected element value.
        #[arg(long)]
        value: String,
    },
    /// Check that a set of objects has an element with all given pairs.
    Nested {
        #[command(flatten)]
        target: TargetArgs,
        /// Expected nested attribute, as `name=value`. Repeatable.
        #[arg(long = "pair", value_parser = parse_pair, required = true)]
        pairs: Vec<(String, String)>,
    },
}

#[derive(Args)]
struct TargetArgs {
    /// State snapshot (JSON).
    #[arg(long)]
    state: PathBuf,
    /// Resource name, e.g. `aws_security_group.web`.
    #[arg(long)]
    resource: String,
    /// Literal dotted address of the set.
    #[arg(long, conflicts_with_all = ["attr", "depth", "under"])]
    key: Option<String>,
    /// Set attribute name, located by depth.
    #[arg(long, requires = "depth")]
    attr: Option<String>,
    /// 1-based segment depth of `attr`.
    #[arg(long, requires = "attr")]
    depth: Option<usize>,
    /// Only consider keys below this dotted prefix.
    #[arg(long, requires = "attr")]
    under: Option<String>,
}

impl TargetArgs {
    fn address(&self) -> Result<Address> {
        match (&self.key, &self.attr, self.depth) {
            (Some(key), _, _) => Ok(Address::literal(key)),
            (None, Some(attr), Some(depth)) => {
                let address = Address::depth(attr, depth);
                Ok(match &self.under {
                    Some(prefix) => address.under(prefix),
                    None => address,
                })
            }
            _ => bail!("either --key or --attr with --depth is required"),
        }
    }
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got {:?}", raw)),
    }
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let cfg = load_config(&config_path).context("load config")?;
    match cli.command {
        Command::Run { state, checks } => cmd_run(&state, &checks, &cfg),
        Command::Elem { target, value } => {
            cmd_single(&target, &MatchRequest::Value(value), &cfg)
        }
        Command::Nested { target, pairs } => {
            let values: BTreeMap<String, String> = pairs.into_iter().collect();
            cmd_single(&target, &MatchRequest::Attrs(values), &cfg)
        }
    }
}

fn cmd_run(state: &Path, checks: &Path, cfg: &SetcheckConfig) -> Result<i32> {
    let report = run_from_paths(state, checks, cfg)?;
    print_report(&report);
    if report.all_passed() {
        Ok(exit_codes::OK)
    } else {
        Ok(exit_codes::FAILED)
    }
}

fn cmd_single(target: &TargetArgs, request: &MatchRequest, cfg: &SetcheckConfig) -> Result<i32> {
    let address = target.address()?;
    let state = load_state(&target.state).context("load state snapshot")?;
    match run_set_check(&state, &target.resource, &address, request) {
        Ok(matched) => {
            println!("pass: element {} in {}", matched.id, matched.collection);
            Ok(exit_codes::OK)
        }
        Err(err) => {
            let err = if cfg.dump_state { err } else { err.without_state() };
            println!("fail: {}", err);
            Ok(exit_codes::FAILED)
        }
    }
}

fn print_report(report: &RunReport) {
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(matched) => println!(
                "pass: {} (element {} in {})",
                outcome.label, matched.id, matched.collection
            ),
            Err(err) => println!("fail: {}\n  {}", outcome.label, err),
        }
    }
    println!(
        "checks: passed={} failed={} skipped={}",
        report.passed(),
        report.failed(),
        report.skipped
    );
}
