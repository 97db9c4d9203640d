//! Error types for the build configuration pass.

use std::path::PathBuf;

use sprout_config::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("module {} references unknown chunk '{chunk}'", module.display())]
    UnknownChunk { module: PathBuf, chunk: String },

    #[error("stage '{stage}' failed: {message}")]
    Stage { stage: &'static str, message: String },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl BuildError {
    /// Authored tables are inconsistent; the build cannot proceed.
    pub fn is_defect(&self) -> bool {
        match self {
            BuildError::Config(e) => e.is_defect(),
            _ => false,
        }
    }
}
