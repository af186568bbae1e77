// crates/level-guardrail/src/lib.rs
// ============================================================================
// Module: Level Guardrail Root
// Description: Public API surface for the conformance level guardrail.
// Purpose: Wire together citation parsing, resolution, extraction, and scanning.
// Dependencies: crate::{audit, citation, config, level, metadata, resolver, scanner}
// ============================================================================

//! ## Overview
//! Test definition files declare a conformance `level:` and cite sections of
//! the specification through `spec_ref:` lines. This crate resolves every
//! citation to the minimum conformance level it implies and reports files
//! whose declared level is lower than the strictest section they cite.
//!
//! The scan is read-only, single-threaded, and collects every violation
//! before reporting.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod audit;
pub mod citation;
pub mod config;
pub mod level;
pub mod metadata;
pub mod resolver;
pub mod scanner;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditDetail;
pub use audit::GuardrailAuditEvent;
pub use audit::GuardrailAuditSink;
pub use audit::GuardrailFileAuditSink;
pub use audit::GuardrailNoopAuditSink;
pub use audit::GuardrailStderrAuditSink;
pub use citation::CITATION_MARKER;
pub use citation::CitationParts;
pub use citation::normalize_citation;
pub use citation::strip_enclosing_quotes;
pub use config::AuditConfig;
pub use config::ConfigError;
pub use config::CorpusConfig;
pub use config::GuardrailConfig;
pub use config::RuleConfig;
pub use level::ConformanceLevel;
pub use level::DeclaredLevel;
pub use metadata::MetadataError;
pub use metadata::MetadataPatterns;
pub use metadata::TestRecord;
pub use resolver::LevelResolver;
pub use resolver::LevelRule;
pub use resolver::MinorMatch;
pub use resolver::RuleTable;
pub use resolver::RuleTableError;
pub use resolver::section_title;
pub use scanner::CorpusScanner;
pub use scanner::DEFAULT_EXTENSION;
pub use scanner::FileOutcome;
pub use scanner::ScanError;
pub use scanner::ScanOptions;
pub use scanner::ScanReport;
pub use scanner::SkipReason;
pub use scanner::Violation;
pub use scanner::evaluate_record;
