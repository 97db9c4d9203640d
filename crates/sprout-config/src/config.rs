//! Project-level configuration for the application build.
//!
//! This module provides the `SproutConfig` struct. For file discovery, see
//! the `discovery` module.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result as ConfigResult};
use crate::loader::{AssetLoaderPartition, ICON_DIR};
use crate::rules::{RuleSet, RuleSpec, application_rules};
use crate::settings::GlobalSettings;
use crate::style::StyleInjection;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SproutConfig {
    /// Entry name to entry modules
    #[serde(default = "default_entries")]
    pub entries: IndexMap<String, Vec<PathBuf>>,

    /// Alias, loader and cache-group records in authoring order
    #[serde(default = "application_rules")]
    pub rules: Vec<RuleSpec>,

    /// Directory whose `.svg` files become sprite symbols
    #[serde(default = "default_icon_dir")]
    pub icon_dir: PathBuf,

    #[serde(default = "default_style")]
    pub style: StyleInjection,

    #[serde(default = "default_true")]
    pub lint_on_save: bool,

    /// Dependencies that must go through the transpiler
    #[serde(default)]
    pub transpile_dependencies: Vec<String>,

    #[serde(default)]
    pub settings: GlobalSettings,
}

impl Default for SproutConfig {
    fn default() -> Self {
        Self {
            entries: default_entries(),
            rules: application_rules(),
            icon_dir: default_icon_dir(),
            style: default_style(),
            lint_on_save: true,
            transpile_dependencies: Vec::new(),
            settings: GlobalSettings::default(),
        }
    }
}

impl SproutConfig {
    /// Create from serde_json::Value (for programmatic config)
    ///
    /// # Example
    ///
    /// ```
    /// use sprout_config::SproutConfig;
    /// use serde_json::json;
    ///
    /// let config = SproutConfig::from_value(json!({
    ///     "lint_on_save": false
    /// }))
    /// .unwrap();
    /// assert!(!config.lint_on_save);
    /// assert!(!config.rules.is_empty());
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Validate the authored rules against a project root.
    pub fn rule_set(&self, root: impl AsRef<Path>) -> ConfigResult<RuleSet> {
        RuleSet::from_specs(root, &self.rules)
    }

    pub fn icon_partition(&self, root: impl AsRef<Path>) -> AssetLoaderPartition {
        AssetLoaderPartition::new("svg", root.as_ref().join(&self.icon_dir))
    }

    /// Style injection with patterns anchored at `root`.
    pub fn style_injection(&self, root: impl AsRef<Path>) -> StyleInjection {
        StyleInjection {
            preprocessor: self.style.preprocessor,
            patterns: self
                .style
                .patterns
                .iter()
                .map(|p| root.as_ref().join(p))
                .collect(),
        }
    }
}

fn default_entries() -> IndexMap<String, Vec<PathBuf>> {
    IndexMap::from([("app".to_string(), vec![PathBuf::from("./src/main.js")])])
}

fn default_icon_dir() -> PathBuf {
    PathBuf::from(ICON_DIR)
}

fn default_style() -> StyleInjection {
    StyleInjection::application("")
}

fn default_true() -> bool {
    true
}
