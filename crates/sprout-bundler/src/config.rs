//! Build configuration threaded through the pipeline.
//!
//! A `BuildConfig` starts out as the mode-independent project description and
//! is handed by value to each stage in turn; every stage returns the next
//! version. Nothing else holds on to it.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sprout_config::{
    AliasTable, BuildEnvironment, CacheGroup, CssOptions, LoaderSpec, MinifyPolicy, Mode,
    SproutConfig, StyleInjection,
};

use crate::minify::MinificationPipeline;
use crate::policy::{PluginSpec, SourceMapKind};

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub public_path: String,
    /// Relative to `dir`; empty puts assets at the output root
    pub assets_dir: String,
}

/// A dynamic-context request narrowed to matching files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextRule {
    pub resource: String,
    pub keep: String,
}

/// Module resolution configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolutionConfig {
    pub aliases: AliasTable,
    /// Resolve symlinks to their real location
    pub symlinks: bool,
    pub contexts: Vec<ContextRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ModuleRule {
    /// Transpiled sources; `exclude` is a regex over the path
    Script {
        test: String,
        exclude: String,
        loader: String,
        options: IndexMap<String, Value>,
    },
    Asset(LoaderSpec),
}

impl ModuleRule {
    pub fn loader(&self) -> &str {
        match self {
            ModuleRule::Script { loader, .. } => loader,
            ModuleRule::Asset(spec) => &spec.loader,
        }
    }
}

/// Optimization settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationConfig {
    /// Cache groups in evaluation order; `None` keeps natural chunks only
    pub split_chunks: Option<Vec<CacheGroup>>,
    pub minimizer: Option<MinifyPolicy>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevServerConfig {
    pub open: bool,
    pub hot: bool,
}

/// Build configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Project root every relative path hangs off
    pub root: PathBuf,

    pub mode: Mode,

    pub entries: IndexMap<String, Vec<PathBuf>>,

    pub output: OutputConfig,

    pub resolution: ResolutionConfig,

    /// Module rules in registration order
    pub module_rules: Vec<ModuleRule>,

    pub devtool: SourceMapKind,

    pub optimization: OptimizationConfig,

    pub plugins: Vec<PluginSpec>,

    pub css: CssOptions,

    pub style: StyleInjection,

    pub dev_server: DevServerConfig,

    pub lint_on_save: bool,

    pub transpile_dependencies: Vec<String>,

    /// Worker cap for compaction; `None` uses every core
    pub parallel_jobs: Option<usize>,
}

impl BuildConfig {
    /// The mode-independent starting point for `project`.
    ///
    /// Mode-dependent fields hold development values until the environment
    /// stage overwrites them.
    pub fn new(root: impl AsRef<Path>, project: &SproutConfig, env: &BuildEnvironment) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            mode: Mode::Development,
            entries: project.entries.clone(),
            output: OutputConfig {
                dir: root.join(&env.output_dir),
                public_path: "/".to_string(),
                assets_dir: String::new(),
            },
            resolution: ResolutionConfig {
                aliases: AliasTable::new(),
                symlinks: true,
                contexts: Vec::new(),
            },
            module_rules: Vec::new(),
            devtool: SourceMapKind::FullInline,
            optimization: OptimizationConfig::default(),
            plugins: Vec::new(),
            css: CssOptions::for_mode(Mode::Development),
            style: project.style_injection(&root),
            dev_server: DevServerConfig {
                open: true,
                hot: env.hot_reload,
            },
            lint_on_save: project.lint_on_save,
            transpile_dependencies: project.transpile_dependencies.clone(),
            parallel_jobs: project.settings.parallel_jobs,
            root,
        }
    }

    pub fn to_value(&self) -> crate::Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// The compaction stage, present only when the mode minifies.
    pub fn minification(&self) -> Option<MinificationPipeline> {
        self.optimization
            .minimizer
            .clone()
            .map(|policy| MinificationPipeline::new(policy).with_jobs(self.parallel_jobs))
    }

    /// Loaders registered for files ending in `extension`.
    pub fn loaders_for(&self, extension: &str) -> Vec<&str> {
        let suffix = format!(r"\.{extension}$");
        self.module_rules
            .iter()
            .filter(|rule| match rule {
                ModuleRule::Asset(spec) => spec.test == suffix,
                ModuleRule::Script { test, .. } => test.contains(extension),
            })
            .map(ModuleRule::loader)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_point_carries_project_settings() {
        let env = BuildEnvironment::default();
        let config = BuildConfig::new("/app", &SproutConfig::default(), &env);
        assert_eq!(config.output.dir, PathBuf::from("/app/dist"));
        assert_eq!(config.output.assets_dir, "");
        assert!(config.resolution.symlinks);
        assert!(config.dev_server.open && config.dev_server.hot);
        assert!(config.lint_on_save);
        assert!(config.plugins.is_empty());
        assert!(config.minification().is_none());
        assert_eq!(
            config.style.patterns,
            vec![PathBuf::from("/app/src/assets/styles/variables.less")]
        );
    }

    #[test]
    fn serializes_for_inspection() {
        let config = BuildConfig::new("/app", &SproutConfig::default(), &BuildEnvironment::default());
        let value = config.to_value().unwrap();
        assert_eq!(value["devtool"], "full-inline");
        assert_eq!(value["entries"]["app"][0], "./src/main.js");
    }
}
