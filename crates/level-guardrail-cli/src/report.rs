// crates/level-guardrail-cli/src/report.rs
// ============================================================================
// Module: Report Rendering
// Description: Formats scan reports for human and machine consumers.
// Purpose: Keep the printed report stable for CI gates.
// Dependencies: level-guardrail, serde_json
// ============================================================================

//! ## Overview
//! The text report is either a single pass line, or a failure header, a blank
//! line, and one bullet per violation. The JSON report carries the same data
//! plus an explicit `passed` flag and the titles of the cited sections.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use level_guardrail::CitationParts;
use level_guardrail::ScanReport;
use level_guardrail::Violation;
use level_guardrail::normalize_citation;
use level_guardrail::section_title;
use serde_json::Value;
use serde_json::json;

use crate::t;

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders the text report as output lines.
#[must_use]
pub fn render_text(report: &ScanReport) -> Vec<String> {
    if report.passed() {
        return vec![t!("report.passed")];
    }
    let mut lines = Vec::with_capacity(report.violations.len() + 2);
    lines.push(t!("report.failed.header"));
    lines.push(String::new());
    for violation in &report.violations {
        lines.push(t!("report.failed.item", violation = violation));
    }
    lines
}

/// Renders the JSON report value.
#[must_use]
pub fn render_json(report: &ScanReport) -> Value {
    json!({
        "passed": report.passed(),
        "files_scanned": report.files_scanned,
        "files_checked": report.files_checked,
        "files_skipped": report.files_skipped,
        "violations": report.violations.iter().map(violation_json).collect::<Vec<_>>(),
    })
}

/// Renders one violation with the titles of its cited sections.
fn violation_json(violation: &Violation) -> Value {
    let sections: BTreeSet<&'static str> = violation
        .citations
        .iter()
        .filter_map(|citation| CitationParts::parse(normalize_citation(citation)).major)
        .filter_map(section_title)
        .collect();
    json!({
        "path": violation.path,
        "declared": violation.declared,
        "required": violation.required,
        "citations": violation.citations,
        "sections": sections,
    })
}
