//! CLI errors and their conversion into diagnostics.

use std::path::PathBuf;

use miette::Report;
use sprout_bundler::BuildError;
use sprout_config::ConfigError;
use sprout_router::RouteError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    #[error("Route error: {0}")]
    Route(#[from] RouteError),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Authored tables are inconsistent.
    pub fn is_defect(&self) -> bool {
        match self {
            CliError::Config(e) => e.is_defect(),
            CliError::Build(e) => e.is_defect(),
            CliError::Route(e) => e.is_defect(),
            _ => false,
        }
    }
}

/// Convert CliError to a miette report with a hint where one helps.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match &err {
        CliError::Config(ConfigError::UnresolvedAlias { request }) => miette::miette!(
            help = "requests must start with one of the registered prefixes (see `sprout inspect`)",
            "No alias matches '{}'",
            request
        ),
        CliError::Config(ConfigError::NotFound) => miette::miette!(
            help = "create sprout.toml or add a \"sprout\" field to package.json",
            "{}",
            err
        ),
        CliError::Route(RouteError::NoMatch { path }) => {
            miette::miette!("No route matches '{}'", path)
        }
        _ if err.is_defect() => miette::miette!(
            help = "fix the authored tables; the build cannot continue",
            "Configuration defect: {}",
            err
        ),
        _ => miette::miette!("{}", err),
    }
}
