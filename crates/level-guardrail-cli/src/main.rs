// crates/level-guardrail-cli/src/main.rs
// ============================================================================
// Module: Level Guardrail CLI Entry Point
// Description: Runs the conformance level guardrail over a test corpus.
// Purpose: Provide a CI gate that fails when test files under-declare their level.
// Dependencies: clap, level-guardrail, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Invoked without arguments, the guardrail loads `level-guardrail.toml` when
//! present, scans `tests/` for `.yaml` test definitions, prints the report to
//! stdout, and exits 0 on pass or 1 on any violation. Setup failures (config,
//! unreadable corpus) print to stderr and exit 2 so gates can tell them apart
//! from findings.
//!
//! Both the default `tests/` root and the default config file are resolved
//! against the current working directory, not the repository root. Run the
//! binary from the repository root, or pass `--root`/`--config` when invoking
//! it from elsewhere.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Parser;
use clap::ValueEnum;
use level_guardrail::CorpusScanner;
use level_guardrail::GuardrailConfig;
use level_guardrail::ScanReport;
use level_guardrail_cli::report::render_json;
use level_guardrail_cli::report::render_text;
use level_guardrail_cli::t;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Exit status for setup failures, distinct from guardrail findings.
const SETUP_FAILURE_EXIT: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "level-guardrail", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue)]
    show_version: bool,
    /// Config file path (defaults to level-guardrail.toml or `LEVEL_GUARDRAIL_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Corpus root override.
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,
    /// Report output format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
}

/// Output formats for the guardrail report.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum ReportFormat {
    /// Human-readable text.
    Text,
    /// JSON report.
    Json,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Loads configuration, scans the corpus, and prints the report.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = GuardrailConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let table = config
        .rule_table()
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let mut options = config.scan_options();
    if let Some(root) = cli.root {
        options.root = root;
    }
    let sink =
        config.audit_sink().map_err(|err| CliError::new(t!("audit.open_failed", error = err)))?;

    let scanner = CorpusScanner::new(options)
        .map_err(|err| CliError::new(t!("scan.failed", error = err)))?
        .with_rule_table(table);
    let report =
        scanner.scan(sink.as_ref()).map_err(|err| CliError::new(t!("scan.failed", error = err)))?;

    match cli.format {
        ReportFormat::Text => write_text_report(&report)?,
        ReportFormat::Json => write_json_report(&report)?,
    }
    Ok(if report.passed() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

// ============================================================================
// SECTION: Output
// ============================================================================

/// Writes the text report to stdout.
fn write_text_report(report: &ScanReport) -> CliResult<()> {
    for line in render_text(report) {
        write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(())
}

/// Writes the JSON report to stdout.
fn write_json_report(report: &ScanReport) -> CliResult<()> {
    let payload = serde_json::to_string_pretty(&render_json(report))
        .map_err(|err| CliError::new(t!("report.serialize_failed", error = err)))?;
    write_stdout_line(&payload).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns the setup-failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::from(SETUP_FAILURE_EXIT)
}
