// crates/level-guardrail/src/level.rs
// ============================================================================
// Module: Conformance Levels
// Description: Ordered conformance tiers and declared file levels.
// Purpose: Keep required and declared levels distinct while comparable.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`ConformanceLevel`] is a tier implied by a specification section, always
//! within `1..=6`. A [`DeclaredLevel`] is whatever non-negative integer a test
//! file declares; it is unbounded on purpose so that out-of-range declarations
//! still compare correctly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Conformance Level
// ============================================================================

/// Conformance tier required by a specification section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ConformanceLevel(u8);

impl ConformanceLevel {
    /// Baseline tier for core sections and malformed citations.
    pub const BASELINE: Self = Self(1);
    /// Strictest tier.
    pub const MAX: Self = Self(6);

    /// Creates a level when `value` falls within the supported range.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= Self::BASELINE.0 && value <= Self::MAX.0 { Some(Self(value)) } else { None }
    }

    /// Creates a level, clamping `value` into the supported range.
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value < Self::BASELINE.0 {
            Self::BASELINE
        } else if value > Self::MAX.0 {
            Self::MAX
        } else {
            Self(value)
        }
    }

    /// Returns the numeric tier.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for ConformanceLevel {
    fn default() -> Self {
        Self::BASELINE
    }
}

impl fmt::Display for ConformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for ConformanceLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            format!(
                "conformance level {value} outside {}..={}",
                Self::BASELINE.0,
                Self::MAX.0
            )
        })
    }
}

impl From<ConformanceLevel> for u8 {
    fn from(level: ConformanceLevel) -> Self {
        level.0
    }
}

// ============================================================================
// SECTION: Declared Level
// ============================================================================

/// Level declared by a test definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct DeclaredLevel(u64);

impl DeclaredLevel {
    /// Wraps a raw declared value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Parses an ASCII digit run; overlong values saturate at `u64::MAX`.
    #[must_use]
    pub fn parse_digits(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
        Some(Self(digits.parse::<u64>().unwrap_or(u64::MAX)))
    }

    /// Returns the raw declared value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns true when this declaration meets `required`.
    #[must_use]
    pub fn satisfies(self, required: ConformanceLevel) -> bool {
        self.0 >= u64::from(required.get())
    }
}

impl fmt::Display for DeclaredLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
