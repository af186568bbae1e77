// crates/level-guardrail/src/citation.rs
// ============================================================================
// Module: Specification Citations
// Description: Citation normalization and component parsing.
// Purpose: Turn free-text `spec_ref` values into comparable section references.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! A citation is the marker glyph followed by `major[.minor[.subsection]]`.
//! Resolution accepts any string and degrades malformed input instead of
//! failing. Extraction from `spec_ref` values lives with the line patterns in
//! [`crate::metadata`].
//!
//! ## Invariants
//! - Normalization never allocates and is idempotent.

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Glyph that introduces a citation inside a `spec_ref` value.
pub const CITATION_MARKER: char = '§';

// ============================================================================
// SECTION: Types
// ============================================================================

/// Dot-separated components of a normalized citation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationParts {
    /// Major section number; `None` when the first component is not an integer.
    pub major: Option<u32>,
    /// Minor section number when the second component is all digits.
    pub minor: Option<u32>,
    /// Raw third component, which may be non-numeric.
    pub subminor: Option<String>,
}

impl CitationParts {
    /// Splits a normalized citation into its components.
    #[must_use]
    pub fn parse(normalized: &str) -> Self {
        let components: Vec<&str> = normalized.split('.').collect();
        let major = components.first().and_then(|first| first.trim().parse::<u32>().ok());
        let minor = components
            .get(1)
            .filter(|second| is_ascii_digits(second))
            .and_then(|second| second.parse::<u32>().ok());
        let subminor = components.get(2).map(|third| (*third).to_string());
        Self {
            major,
            minor,
            subminor,
        }
    }
}

// ============================================================================
// SECTION: Normalization
// ============================================================================

/// Strips one pair of enclosing matching quotes, single or double.
#[must_use]
pub fn strip_enclosing_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1 .. value.len() - 1];
        }
    }
    if value.len() == 1 && (value == "\"" || value == "'") {
        return "";
    }
    value
}

/// Returns the resolution key for a citation: quotes and leading markers removed.
#[must_use]
pub fn normalize_citation(raw: &str) -> &str {
    strip_enclosing_quotes(raw).trim_start_matches(CITATION_MARKER)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true for a non-empty string of ASCII digits.
fn is_ascii_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|byte| byte.is_ascii_digit())
}
