//! Locating the project configuration on disk.
//!
//! `sprout.toml` wins over a `"sprout"` field in `package.json`; a project
//! with neither runs on the built-in application config.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Format, Json, Toml};
use serde_json::Value;

use crate::config::SproutConfig;
use crate::error::{ConfigError, Result};

pub const CONFIG_FILE: &str = "sprout.toml";

/// Finds and parses the project file under `root`.
///
/// Embedders holding a config value already can skip this and call
/// `SproutConfig::from_value()`.
///
/// # Example
///
/// ```no_run
/// use sprout_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load_or_default().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file that would be loaded, if any.
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(CONFIG_FILE);
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        let content = fs::read_to_string(&pkg_path).ok()?;
        let parsed = serde_json::from_str::<Value>(&content).ok()?;
        parsed
            .get("sprout")
            .is_some_and(|v| !v.is_null())
            .then_some(pkg_path)
    }

    /// Parse the discovered file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<SproutConfig> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        self.load_from(&path)
    }

    /// Load the discovered config, or the built-in application config when
    /// the project carries none.
    pub fn load_or_default(&self) -> Result<SproutConfig> {
        match self.load() {
            Err(ConfigError::NotFound) => {
                tracing::debug!(root = %self.root.display(), "no config file, using defaults");
                Ok(SproutConfig::default())
            }
            other => other,
        }
    }

    fn load_from(&self, path: &Path) -> Result<SproutConfig> {
        let (figment, field) = if path.file_name() == Some(OsStr::new("package.json")) {
            (Figment::from(Json::file(path)).focus("sprout"), "package.json")
        } else {
            (Figment::from(Toml::file(path)), CONFIG_FILE)
        };

        let config = figment
            .extract::<SproutConfig>()
            .map_err(|e| ConfigError::InvalidValue {
                field: field.to_string(),
                hint: Some(e.to_string()),
            })?;
        tracing::debug!(path = %path.display(), "loaded project config");
        Ok(config)
    }
}

/// Discover and load config from the current directory
pub fn discover() -> Result<SproutConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load_or_default()
}
