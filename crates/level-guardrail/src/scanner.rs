// crates/level-guardrail/src/scanner.rs
// ============================================================================
// Module: Corpus Scanner
// Description: Walks test definitions and compares declared vs required levels.
// Purpose: Produce a complete, deterministic violation report for a corpus.
// Dependencies: crate::{audit, level, metadata, resolver}, serde, thiserror
// ============================================================================

//! ## Overview
//! The scanner collects every candidate file under the corpus root, sorts the
//! paths, and evaluates each one against a fresh [`LevelResolver`]. Violations
//! never stop the scan; only I/O failures do.
//!
//! ## Invariants
//! - Files are visited in lexicographic path order.
//! - A file is flagged only when it declares a level, has citations, is not
//!   opted out, and declares less than its strictest citation requires.
//! - The scan never writes to the corpus.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::audit::AuditDetail;
use crate::audit::GuardrailAuditEvent;
use crate::audit::GuardrailAuditSink;
use crate::level::ConformanceLevel;
use crate::level::DeclaredLevel;
use crate::metadata::MetadataError;
use crate::metadata::MetadataPatterns;
use crate::metadata::TestRecord;
use crate::resolver::LevelResolver;
use crate::resolver::RuleTable;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default test definition file extension.
pub const DEFAULT_EXTENSION: &str = "yaml";

// ============================================================================
// SECTION: Options
// ============================================================================

/// Inputs for one corpus scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Directory scanned recursively.
    pub root: PathBuf,
    /// File extensions (without the dot) treated as test definitions.
    pub extensions: Vec<String>,
}

impl ScanOptions {
    /// Creates options for `root` with the default extension.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: vec![DEFAULT_EXTENSION.to_string()],
        }
    }

    /// Replaces the recognized extensions.
    #[must_use]
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Returns true when the file name of `path` ends in `.<extension>`.
    ///
    /// A file named exactly `.yaml` counts as a `yaml` file.
    fn accepts(&self, path: &Path) -> bool {
        path.file_name().and_then(|name| name.to_str()).is_some_and(|name| {
            self.extensions.iter().any(|allowed| {
                name.strip_suffix(allowed.as_str()).is_some_and(|stem| stem.ends_with('.'))
            })
        })
    }
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Why a file was not compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The file sets a truthy `guardrail_ignore`.
    GuardrailIgnored,
    /// The file has no `level:` line.
    NoDeclaredLevel,
    /// The file cites no sections.
    NoCitations,
}

impl SkipReason {
    /// Stable label used in audit events.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::GuardrailIgnored => "guardrail_ignored",
            Self::NoDeclaredLevel => "no_declared_level",
            Self::NoCitations => "no_citations",
        }
    }
}

/// A file whose declared level is below what its citations require.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Path relative to the corpus root, `/`-separated.
    pub path: String,
    /// Level the file declares.
    pub declared: DeclaredLevel,
    /// Strictest level implied by the file's citations.
    pub required: ConformanceLevel,
    /// Every citation in the file, sorted and de-duplicated.
    pub citations: Vec<String>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: level {} < required {} from {}",
            self.path,
            self.declared,
            self.required,
            self.citations.join(", ")
        )
    }
}

/// Result of evaluating one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Not subject to the guardrail.
    Skipped(SkipReason),
    /// Declared level meets the requirement.
    Passed {
        /// Level the file declares.
        declared: DeclaredLevel,
        /// Strictest level implied by the file's citations.
        required: ConformanceLevel,
    },
    /// Declared level is below the requirement.
    Violated(Violation),
}

impl FileOutcome {
    /// Builds the audit detail for this outcome.
    fn audit_detail(&self, path: &str, record: &TestRecord) -> AuditDetail {
        let (outcome, required) = match self {
            Self::Skipped(reason) => (reason.label(), None),
            Self::Passed {
                required, ..
            } => ("passed", Some(*required)),
            Self::Violated(violation) => ("violated", Some(violation.required)),
        };
        AuditDetail::File {
            path: path.to_string(),
            outcome,
            declared: record.declared_level,
            required,
        }
    }
}

/// Aggregate scan result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Files read from the corpus.
    pub files_scanned: usize,
    /// Files compared against their citations.
    pub files_checked: usize,
    /// Files skipped as not participating.
    pub files_skipped: usize,
    /// Violations in path order.
    pub violations: Vec<Violation>,
}

impl ScanReport {
    /// Returns true when no violations were found.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Corpus scan failures.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The corpus root does not exist.
    #[error("corpus root {0} does not exist")]
    MissingRoot(String),
    /// The corpus root is not a directory.
    #[error("corpus root {0} is not a directory")]
    NotADirectory(String),
    /// Reading a directory or file failed.
    #[error("failed to read {path}: {message}")]
    Io {
        /// Path being read.
        path: String,
        /// Underlying error message.
        message: String,
    },
    /// Metadata patterns failed to compile.
    #[error(transparent)]
    Pattern(#[from] MetadataError),
}

impl ScanError {
    /// Wraps an I/O error with the path being read.
    fn io(path: &Path, err: &io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Scanner
// ============================================================================

/// Scans a corpus of test definitions for level violations.
#[derive(Debug, Clone)]
pub struct CorpusScanner {
    /// Scan inputs.
    options: ScanOptions,
    /// Compiled metadata patterns.
    patterns: MetadataPatterns,
    /// Policy handed to each run's resolver.
    table: RuleTable,
}

impl CorpusScanner {
    /// Creates a scanner using the standard policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Pattern`] if metadata patterns fail to compile.
    pub fn new(options: ScanOptions) -> Result<Self, ScanError> {
        Ok(Self {
            options,
            patterns: MetadataPatterns::new()?,
            table: RuleTable::standard(),
        })
    }

    /// Replaces the section policy.
    #[must_use]
    pub fn with_rule_table(mut self, table: RuleTable) -> Self {
        self.table = table;
        self
    }

    /// Scans the corpus and collects every violation.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] when the root or any candidate file cannot be read.
    pub fn scan(&self, sink: &dyn GuardrailAuditSink) -> Result<ScanReport, ScanError> {
        let root = &self.options.root;
        let metadata = fs::metadata(root).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                ScanError::MissingRoot(root.display().to_string())
            } else {
                ScanError::io(root, &err)
            }
        })?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(root.display().to_string()));
        }

        let mut files = Vec::new();
        self.collect_files(root, &mut files)?;
        files.sort();
        sink.record(&GuardrailAuditEvent::new(
            "scan_started",
            AuditDetail::Started {
                root: root.display().to_string(),
                candidates: files.len(),
            },
        ));

        let mut resolver = LevelResolver::with_table(self.table.clone());
        let mut report = ScanReport::default();
        for path in files {
            let text = fs::read_to_string(&path).map_err(|err| ScanError::io(&path, &err))?;
            let display = relative_display(root, &path);
            let record = self.patterns.extract(&text);
            let outcome = evaluate_record(&mut resolver, &display, &record);
            sink.record(&GuardrailAuditEvent::new(
                "file_evaluated",
                outcome.audit_detail(&display, &record),
            ));
            report.files_scanned += 1;
            match outcome {
                FileOutcome::Skipped(_) => report.files_skipped += 1,
                FileOutcome::Passed {
                    ..
                } => report.files_checked += 1,
                FileOutcome::Violated(violation) => {
                    report.files_checked += 1;
                    report.violations.push(violation);
                }
            }
        }

        sink.record(&GuardrailAuditEvent::new(
            "scan_finished",
            AuditDetail::Finished {
                files_scanned: report.files_scanned,
                files_checked: report.files_checked,
                violations: report.violations.len(),
                passed: report.passed(),
            },
        ));
        Ok(report)
    }

    /// Recursively collects candidate files; symlinked directories are not followed.
    fn collect_files(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ScanError> {
        for entry in fs::read_dir(dir).map_err(|err| ScanError::io(dir, &err))? {
            let entry = entry.map_err(|err| ScanError::io(dir, &err))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|err| ScanError::io(&path, &err))?;
            if file_type.is_dir() {
                self.collect_files(&path, files)?;
                continue;
            }
            let is_file = if file_type.is_symlink() {
                fs::metadata(&path).is_ok_and(|target| target.is_file())
            } else {
                file_type.is_file()
            };
            if is_file && self.options.accepts(&path) {
                files.push(path);
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Decides the outcome for one file's metadata.
pub fn evaluate_record(
    resolver: &mut LevelResolver,
    path: &str,
    record: &TestRecord,
) -> FileOutcome {
    if record.guardrail_ignore {
        return FileOutcome::Skipped(SkipReason::GuardrailIgnored);
    }
    let Some(declared) = record.declared_level else {
        return FileOutcome::Skipped(SkipReason::NoDeclaredLevel);
    };
    let Some(required) = resolver.required_level(&record.citations) else {
        return FileOutcome::Skipped(SkipReason::NoCitations);
    };
    if declared.satisfies(required) {
        return FileOutcome::Passed {
            declared,
            required,
        };
    }
    let citations: BTreeSet<&str> = record.citations.iter().map(String::as_str).collect();
    FileOutcome::Violated(Violation {
        path: path.to_string(),
        declared,
        required,
        citations: citations.into_iter().map(str::to_string).collect(),
    })
}

/// Renders `path` relative to `root` with `/` separators.
fn relative_display(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
