//! CLI tests for `setcheck run`, `elem` and `nested`.
//!
//! Spawns the setcheck binary against snapshot and check files in a temp
//! directory and verifies exit codes and reported outcomes.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use setcheck::exit_codes;
use setcheck::io::state_store::write_state;
use setcheck::test_support::StateBuilder;

const SG: &str = "aws_security_group.web";

fn write_snapshot(dir: &Path) {
    let state = StateBuilder::new()
        .resource(
            SG,
            &[
                ("ports.#", "2"),
                ("ports.0", "80"),
                ("ports.1", "443"),
                ("rules.#", "1"),
                ("rules.0.ingress.#", "2"),
                ("rules.0.ingress.1701.protocol", "tcp"),
                ("rules.0.ingress.1701.port", "443"),
                ("rules.0.ingress.1702.protocol", "udp"),
                ("rules.0.ingress.1702.port", "53"),
            ],
        )
        .build();
    write_state(&dir.join("state.json"), &state).expect("write state");
}

fn setcheck(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_setcheck"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("spawn setcheck")
}

#[test]
fn run_passes_when_every_check_matches() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_snapshot(temp.path());
    fs::write(
        temp.path().join("checks.toml"),
        r#"
[[checks]]
type = "set_elem_attr"
resource = "aws_security_group.web"
key = "ports"
value = "443"

[[checks]]
type = "set_elem_nested_attrs"
resource = "aws_security_group.web"
attr = "ingress"
depth = 3
under = "rules.0"
values = { protocol = "udp", port = "53" }
"#,
    )
    .expect("write checks");

    let output = setcheck(
        temp.path(),
        &["run", "--state", "state.json", "--checks", "checks.toml"],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(exit_codes::OK), "{stdout}");
    assert!(stdout.contains("checks: passed=2 failed=0 skipped=0"));
    assert!(stdout.contains("element 1702 in rules.0.ingress"));
}

#[test]
fn run_fails_when_a_check_misses() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_snapshot(temp.path());
    fs::write(
        temp.path().join("checks.toml"),
        r#"
[[checks]]
type = "set_elem_attr"
name = "ssh open"
resource = "aws_security_group.web"
key = "ports"
value = "22"
"#,
    )
    .expect("write checks");
    fs::write(temp.path().join("setcheck.toml"), "dump_state = false\n").expect("write config");

    let output = setcheck(
        temp.path(),
        &["run", "--state", "state.json", "--checks", "checks.toml"],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(exit_codes::FAILED));
    assert!(stdout.contains("fail: ssh open"));
    assert!(stdout.contains(r#"has no element with value: "22" in state: <omitted>"#));
}

#[test]
fn elem_reports_not_a_set() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_snapshot(temp.path());

    let output = setcheck(
        temp.path(),
        &[
            "elem",
            "--state",
            "state.json",
            "--resource",
            SG,
            "--key",
            "rules.0.ingress.1701",
            "--value",
            "tcp",
        ],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(exit_codes::FAILED));
    assert!(stdout.contains("does not appear to be a TypeSet"));
}

#[test]
fn nested_matches_literal_key() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_snapshot(temp.path());

    let output = setcheck(
        temp.path(),
        &[
            "nested",
            "--state",
            "state.json",
            "--resource",
            SG,
            "--key",
            "rules.0.ingress",
            "--pair",
            "protocol=tcp",
            "--pair",
            "port=443",
        ],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(exit_codes::OK), "{stdout}");
    assert!(stdout.contains("pass: element 1701 in rules.0.ingress"));
}

#[test]
fn missing_state_file_is_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");

    let output = setcheck(
        temp.path(),
        &[
            "elem",
            "--state",
            "missing.json",
            "--resource",
            SG,
            "--key",
            "ports",
            "--value",
            "80",
        ],
    );
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("load state snapshot"));
}
