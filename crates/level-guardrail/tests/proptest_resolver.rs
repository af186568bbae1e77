// crates/level-guardrail/tests/proptest_resolver.rs
// ============================================================================
// Module: Resolver Property-Based Tests
// Description: Property tests for resolver totality and stability.
// Purpose: Detect panics and ordering sensitivity across wide input ranges.
// ============================================================================

//! Property-based tests for resolver invariants.

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
    reason = "Test-only assertions and helpers are permitted."
)]

use level_guardrail::ConformanceLevel;
use level_guardrail::LevelResolver;
use level_guardrail::MetadataPatterns;
use proptest::prelude::*;

fn citation_strategy() -> impl Strategy<Value = String> {
    (0u32 .. 20, proptest::option::of(0u32 .. 20), proptest::option::of("[a-z0-9]{1,3}")).prop_map(
        |(major, minor, sub)| match (minor, sub) {
            (Some(minor), Some(sub)) => format!("§{major}.{minor}.{sub}"),
            (Some(minor), None) => format!("§{major}.{minor}"),
            (None, _) => format!("§{major}"),
        },
    )
}

proptest! {
    #[test]
    fn resolution_is_total_for_arbitrary_strings(raw in ".*") {
        let level = LevelResolver::new().resolve(&raw);
        prop_assert!(level >= ConformanceLevel::BASELINE);
        prop_assert!(level <= ConformanceLevel::MAX);
    }

    #[test]
    fn resolution_is_deterministic(citation in citation_strategy()) {
        let mut cached = LevelResolver::new();
        let first = cached.resolve(&citation);
        let second = cached.resolve(&citation);
        let fresh = LevelResolver::new().resolve(&citation);
        prop_assert_eq!(first, second);
        prop_assert_eq!(first, fresh);
    }

    #[test]
    fn required_level_ignores_citation_order(
        mut citations in proptest::collection::vec(citation_strategy(), 1 .. 8)
    ) {
        let forward = LevelResolver::new().required_level(&citations);
        citations.reverse();
        let backward = LevelResolver::new().required_level(&citations);
        prop_assert_eq!(forward, backward);
        let mut resolver = LevelResolver::new();
        let expected = citations.iter().map(|c| resolver.resolve(c)).max();
        prop_assert_eq!(forward, expected);
    }

    #[test]
    fn non_numeric_major_is_baseline(major in "[a-z]{1,4}", rest in "(\\.[0-9]{1,2}){0,2}") {
        let citation = format!("§{major}{rest}");
        prop_assert_eq!(LevelResolver::new().resolve(&citation), ConformanceLevel::BASELINE);
    }

    #[test]
    fn eleven_family_is_maximal(sub in "[a-z0-9]{1,4}") {
        let citation = format!("§5.11.{sub}");
        prop_assert_eq!(LevelResolver::new().resolve(&citation), ConformanceLevel::MAX);
    }

    #[test]
    fn extraction_never_panics(value in ".*") {
        let patterns = MetadataPatterns::new().expect("patterns compile");
        for citation in patterns.extract_citations(&value) {
            prop_assert!(citation.starts_with('§'));
            prop_assert!(citation.len() > '§'.len_utf8());
        }
    }
}
