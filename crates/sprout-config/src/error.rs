//! Error types for rule validation, resolution and config loading.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Resolution errors (surfaced to the caller, never defaulted)
    #[error("unresolved alias: '{request}' does not start with a registered prefix")]
    UnresolvedAlias { request: String },

    // Configuration defects (authored tables are inconsistent)
    #[error("duplicate alias prefix: '{prefix}'")]
    DuplicateAlias { prefix: String },

    #[error("loader rules for '.{extension}' overlap at {}", path.display())]
    OverlappingPartition { extension: String, path: PathBuf },

    #[error("loader rules for '.{extension}' leave {} unhandled", path.display())]
    UncoveredPartition { extension: String, path: PathBuf },

    #[error("duplicate cache group: '{name}'")]
    DuplicateCacheGroup { name: String },

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    // Config parsing/loading errors
    #[error("config not found")]
    NotFound,

    #[error("invalid config value for '{field}'{}", hint.as_deref().map(|h| format!(": {h}")).unwrap_or_default())]
    InvalidValue { field: String, hint: Option<String> },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// True for errors caused by internally inconsistent authored tables.
    ///
    /// These abort the build; there is no automatic repair.
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            ConfigError::DuplicateAlias { .. }
                | ConfigError::OverlappingPartition { .. }
                | ConfigError::UncoveredPartition { .. }
                | ConfigError::DuplicateCacheGroup { .. }
                | ConfigError::InvalidPattern { .. }
        )
    }

    pub(crate) fn invalid_pattern(pattern: &str, source: regex::Error) -> Self {
        ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        }
    }
}
