// crates/level-guardrail-cli/tests/cli.rs
// ============================================================================
// Module: CLI End-to-End Tests
// Description: Runs the guardrail binary against temporary corpora.
// Purpose: Verify printed reports and exit statuses seen by CI gates.
// Dependencies: level-guardrail-cli binary, tempfile
// ============================================================================
//! ## Overview
//! Each test builds a corpus under a temporary working directory, runs the
//! binary with no arguments (or a single override), and checks stdout and the
//! exit status.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn guardrail_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_level-guardrail"))
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    fs::write(path, contents).expect("write fixture");
}

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(guardrail_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("LEVEL_GUARDRAIL_CONFIG")
        .output()
        .expect("run level-guardrail")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf-8 stdout")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Verifies an under-declared file fails with an itemized report.
#[test]
fn cli_reports_violation_and_exits_one() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "tests/matching/basic.yaml", "level: 1\nspec_ref: \"§6.2\"\n");
    write(dir.path(), "tests/ops/atomic.yaml", "level: 1\nspec_ref: §12.7 and §12.1\n");
    write(dir.path(), "tests/core/ok.yaml", "level: 6\nspec_ref: §6.1\n");

    let output = run_in(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout(&output),
        "Conformance level guardrail failed:\n\n- matching/basic.yaml: level 1 < required 2 \
         from §6.2\n- ops/atomic.yaml: level 1 < required 6 from §12.1, §12.7\n"
    );
}

/// Verifies a clean corpus passes with the single confirmation line.
#[test]
fn cli_passes_clean_corpus() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "tests/a.yaml", "level: 3\nspec_ref: §10.1\n");
    write(dir.path(), "tests/b.yaml", "guardrail_ignore: yes\nlevel: 1\nspec_ref: §13.1\n");
    write(dir.path(), "tests/c.yaml", "spec_ref: §15.2\n");

    let output = run_in(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "Conformance level guardrail passed.\n");
}

/// Verifies an empty corpus passes.
#[test]
fn cli_passes_empty_corpus() {
    let dir = TempDir::new().expect("temp dir");
    fs::create_dir_all(dir.path().join("tests")).expect("create tests");

    let output = run_in(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "Conformance level guardrail passed.\n");
}

/// Verifies a missing corpus root is a setup failure, not a pass.
#[test]
fn cli_missing_root_exits_two() {
    let dir = TempDir::new().expect("temp dir");

    let output = run_in(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"), "unexpected stderr: {stderr}");
}

/// Verifies the default root follows the working directory.
#[test]
fn cli_default_root_is_relative_to_working_directory() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "tests/a.yaml", "level: 1\nspec_ref: §8.1\n");
    fs::create_dir_all(dir.path().join("docs")).expect("create docs");
    let subdir = dir.path().join("docs");

    let output = run_in(&subdir, &[]);
    assert_eq!(output.status.code(), Some(2));

    let output = run_in(&subdir, &["--root", "../tests"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("- a.yaml: level 1 < required 4 from §8.1"));
}

/// Verifies the config file moves the corpus and extensions.
#[test]
fn cli_honors_config_file() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "level-guardrail.toml", "[corpus]\nroot = \"suite\"\nextensions = [\"yml\"]\n");
    write(dir.path(), "suite/a.yml", "level: 2\nspec_ref: §8.1\n");
    write(dir.path(), "suite/ignored.yaml", "level: 1\nspec_ref: §13.1\n");

    let output = run_in(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("- a.yml: level 2 < required 4 from §8.1"));
    assert!(!stdout(&output).contains("ignored.yaml"));
}

/// Verifies an invalid config fails closed.
#[test]
fn cli_rejects_invalid_config() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "level-guardrail.toml", "[corpus]\nunknown = 1\n");
    fs::create_dir_all(dir.path().join("tests")).expect("create tests");

    let output = run_in(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"), "unexpected stderr: {stderr}");
}

/// Verifies the JSON format and root override.
#[test]
fn cli_json_report_with_root_override() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "other/x.yaml", "level: 2\nspec_ref: '§5.11'\n");

    let output = run_in(dir.path(), &["--root", "other", "--format", "json"]);
    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json report");
    assert_eq!(value["passed"], true);
    assert_eq!(value["files_checked"], 1);
}

/// Verifies audit events go to the configured log, not stdout.
#[test]
fn cli_writes_audit_log() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "level-guardrail.toml", "[audit]\nenabled = true\npath = \"audit.jsonl\"\n");
    write(dir.path(), "tests/a.yaml", "level: 1\nspec_ref: §2.1\n");

    let output = run_in(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "Conformance level guardrail passed.\n");
    let log = fs::read_to_string(dir.path().join("audit.jsonl")).expect("audit log");
    let events: Vec<serde_json::Value> =
        log.lines().map(|line| serde_json::from_str(line).expect("json line")).collect();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0]["event"], "scan_started");
    assert_eq!(events[1]["event"], "file_evaluated");
    assert_eq!(events[1]["outcome"], "passed");
    assert_eq!(events[2]["event"], "scan_finished");
    assert_eq!(events[2]["passed"], true);
}
