// crates/level-guardrail/src/resolver.rs
// ============================================================================
// Module: Section-Level Resolver
// Description: Rule table mapping specification sections to conformance levels.
// Purpose: Resolve citations to the minimum level they imply, memoized per run.
// Dependencies: crate::{citation, level}, thiserror
// ============================================================================

//! ## Overview
//! The policy is an ordered list of [`LevelRule`] entries evaluated
//! first-match-wins. Anything the table does not match, including citations
//! with a non-numeric major, resolves to [`ConformanceLevel::BASELINE`].
//!
//! ## Invariants
//! - Resolution is total and deterministic for a given table.
//! - The cache is owned by one [`LevelResolver`]; separate resolvers never
//!   share entries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;

use thiserror::Error;

use crate::citation::CitationParts;
use crate::citation::normalize_citation;
use crate::level::ConformanceLevel;

// ============================================================================
// SECTION: Section Titles
// ============================================================================

/// Titles of the numbered specification sections.
const SECTION_TITLES: &[&str] = &[
    "Overview",
    "Terminology",
    "Collection Layout",
    "Frontmatter",
    "Configuration",
    "Types",
    "Matching",
    "Field Types",
    "Links",
    "Validation",
    "Querying",
    "Expressions",
    "Operations",
    "Caching",
    "Conformance",
    "Watching",
];

/// Returns the title of a numbered specification section, if known.
#[must_use]
pub fn section_title(major: u32) -> Option<&'static str> {
    usize::try_from(major).ok().and_then(|index| SECTION_TITLES.get(index)).copied()
}

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Minor-section predicate for a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinorMatch {
    /// Matches any minor, including none.
    Any,
    /// Matches only the listed numeric minors.
    OneOf(Vec<u32>),
}

impl MinorMatch {
    /// Returns true when `minor` satisfies this predicate.
    #[must_use]
    pub fn matches(&self, minor: Option<u32>) -> bool {
        match self {
            Self::Any => true,
            Self::OneOf(minors) => minor.is_some_and(|value| minors.contains(&value)),
        }
    }
}

/// One entry of the section-to-level policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRule {
    /// Major section the rule applies to.
    pub major: u32,
    /// Minor-section predicate.
    pub minor: MinorMatch,
    /// Optional prefix the normalized citation must start with.
    pub raw_prefix: Option<String>,
    /// Level implied when the rule matches.
    pub level: ConformanceLevel,
}

impl LevelRule {
    /// Rule matching every citation under `major`.
    #[must_use]
    pub const fn major(major: u32, level: u8) -> Self {
        Self {
            major,
            minor: MinorMatch::Any,
            raw_prefix: None,
            level: ConformanceLevel::clamped(level),
        }
    }

    /// Rule matching the listed minors under `major`.
    #[must_use]
    pub fn minors(major: u32, minors: &[u32], level: u8) -> Self {
        Self {
            major,
            minor: MinorMatch::OneOf(minors.to_vec()),
            raw_prefix: None,
            level: ConformanceLevel::clamped(level),
        }
    }

    /// Rule matching normalized citations that start with `prefix` under `major`.
    #[must_use]
    pub fn prefix(major: u32, prefix: &str, level: u8) -> Self {
        Self {
            major,
            minor: MinorMatch::Any,
            raw_prefix: Some(prefix.to_string()),
            level: ConformanceLevel::clamped(level),
        }
    }

    /// Returns true when the rule applies to the citation.
    fn matches(&self, normalized: &str, parts: &CitationParts) -> bool {
        parts.major == Some(self.major)
            && self.minor.matches(parts.minor)
            && self.raw_prefix.as_deref().is_none_or(|prefix| normalized.starts_with(prefix))
    }
}

// ============================================================================
// SECTION: Rule Table
// ============================================================================

/// Rule table validation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleTableError {
    /// A minor predicate lists no minors.
    #[error("rule {index} (major {major}) lists no minors")]
    EmptyMinors {
        /// Rule position in the table.
        index: usize,
        /// Major section of the rule.
        major: u32,
    },
    /// A prefix predicate does not start with the rule's major.
    #[error("rule {index} prefix {prefix:?} must start with \"{major}.\"")]
    PrefixMismatch {
        /// Rule position in the table.
        index: usize,
        /// Major section of the rule.
        major: u32,
        /// Offending prefix.
        prefix: String,
    },
}

/// Ordered, first-match-wins section policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    /// Rules in evaluation order.
    rules: Vec<LevelRule>,
}

impl RuleTable {
    /// Returns the standard policy.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            rules: vec![
                LevelRule::major(6, 2),
                LevelRule::major(10, 3),
                LevelRule::major(11, 3),
                LevelRule::major(8, 4),
                LevelRule::major(13, 6),
                LevelRule::major(15, 6),
                // Operations: only atomic and multi-step subsections are advanced.
                LevelRule::minors(12, &[7, 8, 13], 6),
                LevelRule::minors(12, &[5], 5),
                LevelRule::major(12, 1),
                // Types: the 5.11 family is alphanumeric, so it matches by prefix.
                LevelRule::prefix(5, "5.11.", 6),
                LevelRule::minors(5, &[9], 6),
                LevelRule::minors(5, &[12, 13], 3),
                LevelRule::major(5, 1),
            ],
        }
    }

    /// Builds a custom table after validating every rule.
    ///
    /// # Errors
    ///
    /// Returns [`RuleTableError`] when a rule can never match.
    pub fn from_rules(rules: Vec<LevelRule>) -> Result<Self, RuleTableError> {
        for (index, rule) in rules.iter().enumerate() {
            if let MinorMatch::OneOf(minors) = &rule.minor
                && minors.is_empty()
            {
                return Err(RuleTableError::EmptyMinors {
                    index,
                    major: rule.major,
                });
            }
            if let Some(prefix) = &rule.raw_prefix
                && !prefix.starts_with(&format!("{}.", rule.major))
            {
                return Err(RuleTableError::PrefixMismatch {
                    index,
                    major: rule.major,
                    prefix: prefix.clone(),
                });
            }
        }
        Ok(Self {
            rules,
        })
    }

    /// Returns the first rule matching a normalized citation.
    #[must_use]
    pub fn matching_rule(&self, normalized: &str) -> Option<&LevelRule> {
        let parts = CitationParts::parse(normalized);
        parts.major?;
        self.rules.iter().find(|rule| rule.matches(normalized, &parts))
    }

    /// Evaluates a normalized citation against the table.
    #[must_use]
    pub fn evaluate(&self, normalized: &str) -> ConformanceLevel {
        self.matching_rule(normalized).map_or(ConformanceLevel::BASELINE, |rule| rule.level)
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Memoizing citation resolver scoped to one scan run.
#[derive(Debug, Clone, Default)]
pub struct LevelResolver {
    /// Policy used for uncached citations.
    table: RuleTable,
    /// Resolved levels keyed by normalized citation.
    cache: HashMap<String, ConformanceLevel>,
}

impl LevelResolver {
    /// Creates a resolver using the standard policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver using a custom policy.
    #[must_use]
    pub fn with_table(table: RuleTable) -> Self {
        Self {
            table,
            cache: HashMap::new(),
        }
    }

    /// Resolves a citation to the minimum level it implies.
    pub fn resolve(&mut self, citation: &str) -> ConformanceLevel {
        let key = normalize_citation(citation);
        if let Some(level) = self.cache.get(key) {
            return *level;
        }
        let level = self.table.evaluate(key);
        self.cache.insert(key.to_string(), level);
        level
    }

    /// Returns the strictest level across `citations`, or `None` when empty.
    pub fn required_level<I, S>(&mut self, citations: I) -> Option<ConformanceLevel>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        citations.into_iter().map(|citation| self.resolve(citation.as_ref())).max()
    }

    /// Returns the number of memoized citations.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}
