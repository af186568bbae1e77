// crates/level-guardrail/src/config.rs
// ============================================================================
// Module: Guardrail Configuration
// Description: Configuration loading and validation for the level guardrail.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: crate::{audit, level, resolver, scanner}, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is optional. Without a file the guardrail scans `tests/` for
//! `.yaml` definitions using the standard section policy. A TOML file can move
//! the corpus, change the recognized extensions, enable audit logging, or
//! replace the policy table. Relative paths resolve against the directory of
//! the config file.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::audit::GuardrailAuditSink;
use crate::audit::GuardrailFileAuditSink;
use crate::audit::GuardrailNoopAuditSink;
use crate::audit::GuardrailStderrAuditSink;
use crate::level::ConformanceLevel;
use crate::resolver::LevelRule;
use crate::resolver::MinorMatch;
use crate::resolver::RuleTable;
use crate::scanner::DEFAULT_EXTENSION;
use crate::scanner::ScanOptions;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "level-guardrail.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "LEVEL_GUARDRAIL_CONFIG";
/// Default corpus root, relative to the config directory or else the working directory.
pub const DEFAULT_CORPUS_ROOT: &str = "tests";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of recognized extensions.
pub(crate) const MAX_EXTENSIONS: usize = 16;
/// Maximum number of custom policy rules.
pub(crate) const MAX_RULES: usize = 256;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Level guardrail configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardrailConfig {
    /// Corpus discovery configuration.
    #[serde(default)]
    pub corpus: CorpusConfig,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Custom policy rules; empty means the standard table.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
    /// Directory relative paths resolve against (not serialized).
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// Corpus discovery configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorpusConfig {
    /// Directory scanned recursively.
    #[serde(default = "default_corpus_root")]
    pub root: String,
    /// File extensions treated as test definitions.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root: default_corpus_root(),
            extensions: default_extensions(),
        }
    }
}

/// Audit logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Enables audit events.
    #[serde(default)]
    pub enabled: bool,
    /// Optional JSON-lines log file; stderr when unset.
    #[serde(default)]
    pub path: Option<String>,
}

/// One custom policy rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// Major section the rule applies to.
    pub major: u32,
    /// Minor sections the rule is limited to.
    #[serde(default)]
    pub minors: Option<Vec<u32>>,
    /// Prefix the normalized citation must start with.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Level implied by the rule.
    pub level: u8,
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl GuardrailConfig {
    /// Loads configuration using the default resolution rules.
    ///
    /// An explicit path or environment override must exist; a missing default
    /// file yields the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        validate_path(&resolved)?;
        if !explicit && !resolved.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::parse(content)?;
        config.base_dir = resolved.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Parses and validates TOML configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.corpus.validate()?;
        self.audit.validate()?;
        if self.rules.len() > MAX_RULES {
            return Err(ConfigError::Invalid("too many rules".to_string()));
        }
        self.rule_table()?;
        Ok(())
    }

    /// Returns the policy table: custom rules when configured, else standard.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a custom rule is invalid.
    pub fn rule_table(&self) -> Result<RuleTable, ConfigError> {
        if self.rules.is_empty() {
            return Ok(RuleTable::standard());
        }
        let rules = self
            .rules
            .iter()
            .enumerate()
            .map(|(index, rule)| rule.to_level_rule(index))
            .collect::<Result<Vec<_>, _>>()?;
        RuleTable::from_rules(rules).map_err(|err| ConfigError::Invalid(err.to_string()))
    }

    /// Returns the corpus root, resolved against the config directory.
    #[must_use]
    pub fn corpus_root(&self) -> PathBuf {
        self.resolve_relative(&self.corpus.root)
    }

    /// Returns scan options for the configured corpus.
    #[must_use]
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::new(self.corpus_root()).with_extensions(self.corpus.extensions.clone())
    }

    /// Opens the audit sink selected by `[audit]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the audit log file cannot be opened.
    pub fn audit_sink(&self) -> io::Result<Box<dyn GuardrailAuditSink>> {
        if !self.audit.enabled {
            return Ok(Box::new(GuardrailNoopAuditSink));
        }
        match &self.audit.path {
            Some(path) => {
                Ok(Box::new(GuardrailFileAuditSink::new(&self.resolve_relative(path))?))
            }
            None => Ok(Box::new(GuardrailStderrAuditSink)),
        }
    }

    /// Joins a relative path onto the config directory.
    fn resolve_relative(&self, value: &str) -> PathBuf {
        let path = Path::new(value);
        match &self.base_dir {
            Some(base) if path.is_relative() && !base.as_os_str().is_empty() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl CorpusConfig {
    /// Validates corpus settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("corpus.root", &self.root)?;
        if self.extensions.is_empty() {
            return Err(ConfigError::Invalid("corpus.extensions must be non-empty".to_string()));
        }
        if self.extensions.len() > MAX_EXTENSIONS {
            return Err(ConfigError::Invalid("corpus.extensions has too many entries".to_string()));
        }
        for extension in &self.extensions {
            if extension.trim().is_empty() || extension.contains('.') || extension.contains('/') {
                return Err(ConfigError::Invalid(format!(
                    "corpus.extensions entry {extension:?} must be a bare extension"
                )));
            }
        }
        Ok(())
    }
}

impl AuditConfig {
    /// Validates audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        Ok(())
    }
}

impl RuleConfig {
    /// Converts the config entry into a policy rule.
    fn to_level_rule(&self, index: usize) -> Result<LevelRule, ConfigError> {
        let level = ConformanceLevel::new(self.level).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "rules[{index}].level must be within {}..={}",
                ConformanceLevel::BASELINE,
                ConformanceLevel::MAX
            ))
        })?;
        Ok(LevelRule {
            major: self.major,
            minor: self.minors.clone().map_or(MinorMatch::Any, MinorMatch::OneOf),
            raw_prefix: self.prefix.clone(),
            level,
        })
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Default corpus root value.
fn default_corpus_root() -> String {
    DEFAULT_CORPUS_ROOT.to_string()
}

/// Default extension list.
fn default_extensions() -> Vec<String> {
    vec![DEFAULT_EXTENSION.to_string()]
}

/// Resolves the config path from CLI or environment defaults.
///
/// The flag reports whether the path was requested explicitly.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    let path = Path::new(trimmed);
    for component in path.components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}
