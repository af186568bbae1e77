// crates/level-guardrail/tests/resolver.rs
// ============================================================================
// Module: Section-Level Resolver Tests
// Description: Covers the standard policy table and resolver memoization.
// Purpose: Pin every branch of the section-to-level mapping.
// Dependencies: level-guardrail
// ============================================================================

//! ## Overview
//! Checks each major/minor branch of the standard table, the fallback for
//! malformed citations, the alphanumeric 5.11 family, and cache scoping.

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

use level_guardrail::ConformanceLevel;
use level_guardrail::LevelResolver;
use level_guardrail::LevelRule;
use level_guardrail::MinorMatch;
use level_guardrail::RuleTable;
use level_guardrail::RuleTableError;
use level_guardrail::section_title;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn level(citation: &str) -> u8 {
    LevelResolver::new().resolve(citation).get()
}

// ============================================================================
// SECTION: Standard Table
// ============================================================================

#[test]
fn unconditional_majors_map_to_fixed_levels() {
    assert_eq!(level("§6"), 2);
    assert_eq!(level("§6.4"), 2);
    assert_eq!(level("§10.1"), 3);
    assert_eq!(level("§11.3.2"), 3);
    assert_eq!(level("§8.2"), 4);
    assert_eq!(level("§13"), 6);
    assert_eq!(level("§15.1"), 6);
}

#[test]
fn operations_levels_depend_on_minor() {
    assert_eq!(level("§12.7"), 6);
    assert_eq!(level("§12.8"), 6);
    assert_eq!(level("§12.13"), 6);
    assert_eq!(level("§12.5"), 5);
    assert_eq!(level("§12.1"), 1);
    assert_eq!(level("§12.6"), 1);
    assert_eq!(level("§12"), 1);
}

#[test]
fn type_system_levels_depend_on_minor() {
    assert_eq!(level("§5.9"), 6);
    assert_eq!(level("§5.12"), 3);
    assert_eq!(level("§5.13"), 3);
    assert_eq!(level("§5.1"), 1);
    assert_eq!(level("§5"), 1);
}

#[test]
fn type_system_eleven_family_matches_by_prefix() {
    assert_eq!(level("§5.11.1"), 6);
    assert_eq!(level("5.11.a"), 6);
    assert_eq!(level("§5.11.x.y"), 6);
    assert_eq!(level("§5.11"), 1);
    assert_ne!(level("§5.11.2"), level("§5.1.2"));
}

#[test]
fn core_sections_default_to_baseline() {
    for citation in ["§2.1", "§3", "§4.4", "§7.2", "§9.1", "§14.1", "§0", "§16.2", "§99"] {
        assert_eq!(level(citation), 1, "{citation}");
    }
}

#[test]
fn malformed_major_falls_back_to_baseline() {
    assert_eq!(level("§abc"), 1);
    assert_eq!(level(""), 1);
    assert_eq!(level("§"), 1);
    assert_eq!(level("§.12.7"), 1);
    assert_eq!(level("x6.1"), 1);
}

#[test]
fn non_numeric_minor_uses_major_default() {
    assert_eq!(level("§12.x"), 1);
    assert_eq!(level("§5.nine"), 1);
    assert_eq!(level("§6.x"), 2);
}

#[test]
fn marker_and_quotes_are_stripped_before_lookup() {
    let mut resolver = LevelResolver::new();
    assert_eq!(resolver.resolve("\"§12.7\""), ConformanceLevel::MAX);
    assert_eq!(resolver.resolve("§§12.7"), ConformanceLevel::MAX);
    assert_eq!(resolver.resolve("12.7"), ConformanceLevel::MAX);
    assert_eq!(resolver.cache_len(), 1);
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

#[test]
fn repeated_resolution_is_stable_and_cached() {
    let mut resolver = LevelResolver::new();
    let first = resolver.resolve("§8.1");
    let second = resolver.resolve("§8.1");
    assert_eq!(first, second);
    assert_eq!(resolver.cache_len(), 1);
}

#[test]
fn resolvers_do_not_share_caches() {
    let mut first = LevelResolver::new();
    first.resolve("§6.1");
    first.resolve("§10.1");
    let second = LevelResolver::new();
    assert_eq!(first.cache_len(), 2);
    assert_eq!(second.cache_len(), 0);
}

#[test]
fn required_level_is_the_maximum() {
    let mut resolver = LevelResolver::new();
    let required = resolver.required_level(["§12.1", "§12.7", "§2.1"]);
    assert_eq!(required, ConformanceLevel::new(6));
    let required = resolver.required_level(["§2.1", "§6.1"]);
    assert_eq!(required, ConformanceLevel::new(2));
    let empty: [&str; 0] = [];
    assert_eq!(resolver.required_level(empty), None);
}

// ============================================================================
// SECTION: Custom Tables
// ============================================================================

#[test]
fn custom_table_is_first_match_wins() {
    let table = RuleTable::from_rules(vec![
        LevelRule::minors(3, &[2], 4),
        LevelRule::major(3, 2),
        LevelRule::major(3, 5),
    ])
    .expect("valid table");
    let mut resolver = LevelResolver::with_table(table);
    assert_eq!(resolver.resolve("§3.2").get(), 4);
    assert_eq!(resolver.resolve("§3.1").get(), 2);
    assert_eq!(resolver.resolve("§12.7").get(), 1);
}

#[test]
fn custom_table_rejects_unmatchable_rules() {
    let empty = LevelRule {
        major: 4,
        minor: MinorMatch::OneOf(Vec::new()),
        raw_prefix: None,
        level: ConformanceLevel::MAX,
    };
    assert_eq!(
        RuleTable::from_rules(vec![empty]),
        Err(RuleTableError::EmptyMinors {
            index: 0,
            major: 4
        })
    );
    let mismatch = LevelRule::prefix(5, "6.11.", 6);
    assert!(matches!(
        RuleTable::from_rules(vec![LevelRule::major(1, 1), mismatch]),
        Err(RuleTableError::PrefixMismatch {
            index: 1,
            ..
        })
    ));
}

#[test]
fn section_titles_follow_document_order() {
    assert_eq!(section_title(5), Some("Types"));
    assert_eq!(section_title(12), Some("Operations"));
    assert_eq!(section_title(15), Some("Watching"));
    assert_eq!(section_title(16), None);
}
