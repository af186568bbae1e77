// crates/level-guardrail/src/metadata.rs
// ============================================================================
// Module: Test Metadata Extraction
// Description: Line-oriented extraction of level, opt-out, and citation fields.
// Purpose: Read guardrail metadata without parsing the surrounding document.
// Dependencies: crate::{citation, level}, regex, thiserror
// ============================================================================

//! ## Overview
//! Test definition files may hold arbitrary structure. Only three keys matter
//! here, each recognized by a line that starts (after indentation) with the
//! key followed by `:`. Everything else is ignored.
//!
//! ## Invariants
//! - `level:` and `guardrail_ignore:` are first-match-wins.
//! - `spec_ref:` lines accumulate in file order.
//! - Extracted citations keep their marker and appear in source order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;
use thiserror::Error;

use crate::citation::strip_enclosing_quotes;
use crate::level::DeclaredLevel;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Pattern for the declared level line.
const LEVEL_PATTERN: &str = r"^\s*level:\s*([0-9]+)\s*$";
/// Pattern for the guardrail opt-out line.
const IGNORE_PATTERN: &str = r"^\s*guardrail_ignore:\s*(.+)$";
/// Pattern for citation lines.
const SPEC_REF_PATTERN: &str = r"^\s*spec_ref:\s*(.+)$";
/// Pattern for one citation inside a `spec_ref` value.
const CITATION_PATTERN: &str = r"§([0-9]+(?:\.[0-9]+)*)";
/// Opt-out values treated as true.
const TRUTHY_VALUES: &[&str] = &["true", "yes", "on"];

// ============================================================================
// SECTION: Types
// ============================================================================

/// Guardrail metadata extracted from one test definition file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestRecord {
    /// Declared level; `None` means the file has not opted in.
    pub declared_level: Option<DeclaredLevel>,
    /// True when the file opts out of the guardrail.
    pub guardrail_ignore: bool,
    /// Citations in file order, duplicates retained.
    pub citations: Vec<String>,
}

/// Pattern compilation failure.
#[derive(Debug, Error)]
#[error("metadata pattern {pattern} failed to compile: {message}")]
pub struct MetadataError {
    /// Pattern source.
    pub pattern: &'static str,
    /// Compiler message.
    pub message: String,
}

/// Compiled line patterns for the recognized keys.
#[derive(Debug, Clone)]
pub struct MetadataPatterns {
    /// `level:` matcher.
    level: Regex,
    /// `guardrail_ignore:` matcher.
    ignore: Regex,
    /// `spec_ref:` matcher.
    spec_ref: Regex,
    /// Citation matcher applied to `spec_ref:` values.
    citation: Regex,
}

impl MetadataPatterns {
    /// Compiles the line patterns.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError`] if a pattern fails to compile.
    pub fn new() -> Result<Self, MetadataError> {
        Ok(Self {
            level: compile(LEVEL_PATTERN)?,
            ignore: compile(IGNORE_PATTERN)?,
            spec_ref: compile(SPEC_REF_PATTERN)?,
            citation: compile(CITATION_PATTERN)?,
        })
    }

    /// Extracts all guardrail metadata from file text.
    #[must_use]
    pub fn extract(&self, text: &str) -> TestRecord {
        TestRecord {
            declared_level: self.declared_level(text),
            guardrail_ignore: self.guardrail_ignore(text),
            citations: self.citations(text),
        }
    }

    /// Returns the first declared level in `text`.
    #[must_use]
    pub fn declared_level(&self, text: &str) -> Option<DeclaredLevel> {
        text.lines()
            .filter_map(|line| self.level.captures(line))
            .find_map(|captures| captures.get(1).and_then(|m| DeclaredLevel::parse_digits(m.as_str())))
    }

    /// Returns the value of the first opt-out line; later lines are ignored.
    #[must_use]
    pub fn guardrail_ignore(&self, text: &str) -> bool {
        let Some(value) = text
            .lines()
            .find_map(|line| self.ignore.captures(line).and_then(|captures| captures.get(1)))
        else {
            return false;
        };
        let value = value.as_str().trim().to_lowercase();
        TRUTHY_VALUES.contains(&value.as_str())
    }

    /// Returns every citation from every `spec_ref:` line.
    #[must_use]
    pub fn citations(&self, text: &str) -> Vec<String> {
        text.lines()
            .filter_map(|line| self.spec_ref.captures(line).and_then(|captures| captures.get(1)))
            .flat_map(|value| self.extract_citations(value.as_str()))
            .collect()
    }

    /// Extracts every citation from a single `spec_ref` field value.
    ///
    /// The value is trimmed and loses one pair of enclosing quotes, then every
    /// `§<digits>(.<digits>)*` match is returned left to right, duplicates kept.
    #[must_use]
    pub fn extract_citations(&self, value: &str) -> Vec<String> {
        let value = strip_enclosing_quotes(value.trim());
        self.citation.find_iter(value).map(|found| found.as_str().to_string()).collect()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Compiles a static pattern.
fn compile(pattern: &'static str) -> Result<Regex, MetadataError> {
    Regex::new(pattern).map_err(|err| MetadataError {
        pattern,
        message: err.to_string(),
    })
}
