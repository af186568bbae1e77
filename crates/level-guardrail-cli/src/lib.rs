// crates/level-guardrail-cli/src/lib.rs
// ============================================================================
// Module: Level Guardrail CLI Library
// Description: Shared helpers for the level guardrail command-line interface.
// Purpose: Provide reusable components (catalog, rendering) for the binary and tests.
// Dependencies: level-guardrail, serde_json
// ============================================================================

//! ## Overview
//! This library houses the message catalog and report rendering used by the
//! `level-guardrail` binary. The binary entry point (`src/main.rs`) imports
//! these helpers so every printed line comes from one place.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Message catalog helpers.
pub mod i18n;
/// Report rendering for text and JSON output.
pub mod report;
