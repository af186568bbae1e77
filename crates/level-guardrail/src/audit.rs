// crates/level-guardrail/src/audit.rs
// ============================================================================
// Module: Guardrail Audit Logging
// Description: Structured audit events for corpus scans.
// Purpose: Emit JSON-line scan logs without touching the stdout report.
// Dependencies: crate::{level, scanner}, serde, serde_json
// ============================================================================

//! ## Overview
//! Scans emit one event when they start, one per evaluated file, and one when
//! they finish. Sinks serialize events as JSON lines so CI systems can route
//! them to their own log pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::level::ConformanceLevel;
use crate::level::DeclaredLevel;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Guardrail audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct GuardrailAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Event-specific fields.
    #[serde(flatten)]
    pub detail: AuditDetail,
}

/// Event-specific audit fields.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AuditDetail {
    /// Scan start.
    Started {
        /// Corpus root being scanned.
        root: String,
        /// Number of candidate files discovered.
        candidates: usize,
    },
    /// One file evaluated.
    File {
        /// Path relative to the corpus root.
        path: String,
        /// Outcome label (`passed`, `violated`, or a skip reason).
        outcome: &'static str,
        /// Declared level when present.
        declared: Option<DeclaredLevel>,
        /// Required level when citations were present.
        required: Option<ConformanceLevel>,
    },
    /// Scan completion.
    Finished {
        /// Files read.
        files_scanned: usize,
        /// Files compared against their citations.
        files_checked: usize,
        /// Violations found.
        violations: usize,
        /// Overall result.
        passed: bool,
    },
}

impl GuardrailAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(event: &'static str, detail: AuditDetail) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event,
            timestamp_ms,
            detail,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for guardrail scan events.
pub trait GuardrailAuditSink {
    /// Record an audit event.
    fn record(&self, event: &GuardrailAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct GuardrailStderrAuditSink;

impl GuardrailAuditSink for GuardrailStderrAuditSink {
    fn record(&self, event: &GuardrailAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct GuardrailFileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl GuardrailFileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl GuardrailAuditSink for GuardrailFileAuditSink {
    fn record(&self, event: &GuardrailAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct GuardrailNoopAuditSink;

impl GuardrailAuditSink for GuardrailNoopAuditSink {
    fn record(&self, _event: &GuardrailAuditEvent) {}
}
