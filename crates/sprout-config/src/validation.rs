//! Turning a parsed `SproutConfig` into a checked `RuleSet`.
//!
//! `SchemaValidator` never touches the disk; `FsValidator` also confirms the
//! files the project points at exist.

use std::path::{Path, PathBuf};

use crate::alias::AliasEntry;
use crate::config::SproutConfig;
use crate::error::{ConfigError, Result};
use crate::rules::RuleSet;

pub trait ConfigValidator {
    fn validate(&self, config: &SproutConfig) -> Result<RuleSet>;
}

/// Checks entries and compiles the rule table.
///
/// # Example
///
/// ```
/// use sprout_config::{ConfigValidator, SchemaValidator, SproutConfig};
///
/// let rules = SchemaValidator::new("/app")
///     .validate(&SproutConfig::default())
///     .unwrap();
/// assert_eq!(rules.cache_groups.len(), 4);
/// ```
pub struct SchemaValidator {
    root: PathBuf,
}

impl SchemaValidator {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &SproutConfig) -> Result<RuleSet> {
        if config.entries.is_empty() || config.entries.values().any(Vec::is_empty) {
            return Err(ConfigError::InvalidValue {
                field: "entries".to_string(),
                hint: Some("every entry needs at least one module".to_string()),
            });
        }
        config.rule_set(&self.root)
    }
}

/// Schema checks plus the project's files on disk.
///
/// Runs schema validation, then checks that entry modules and injected
/// stylesheets exist. Alias targets are not checked here; see
/// [`missing_alias_targets`].
pub struct FsValidator {
    root: PathBuf,
}

impl FsValidator {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &SproutConfig) -> Result<RuleSet> {
        let rules = SchemaValidator::new(&self.root).validate(config)?;

        for module in config.entries.values().flatten() {
            let path = self.root.join(module);
            if !path.exists() {
                return Err(ConfigError::InvalidValue {
                    field: "entries".to_string(),
                    hint: Some(format!("entry module not found: {}", path.display())),
                });
            }
        }

        for pattern in config.style_injection(&self.root).patterns {
            if !pattern.exists() {
                return Err(ConfigError::InvalidValue {
                    field: "style.patterns".to_string(),
                    hint: Some(format!("stylesheet not found: {}", pattern.display())),
                });
            }
        }

        Ok(rules)
    }
}

/// Aliases whose target directory does not exist yet. Not a defect: a prefix
/// may be reserved before its directory is created.
pub fn missing_alias_targets(rules: &RuleSet) -> Vec<AliasEntry> {
    rules
        .aliases
        .entries()
        .filter(|entry| !entry.target.is_dir())
        .collect()
}
