//! Environment-conditioned build policy.
//!
//! The mode is read once; every other stage consumes the [`BuildSettings`]
//! derived here instead of looking at the environment again.

use serde::{Deserialize, Serialize};
use sprout_config::{BuildEnvironment, CacheGroup, CssOptions, MinifyPolicy, Mode};

use crate::chunks::ChunkGroupingPolicy;
use crate::error::Result;

/// Source map emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceMapKind {
    /// No maps for the shipped artifact
    Disabled,
    /// Maps with sources embedded in each chunk
    FullInline,
    /// Line mappings only, sources left out
    NoSources,
}

impl SourceMapKind {
    /// The bundler's devtool name, `None` when disabled.
    pub fn devtool(self) -> Option<&'static str> {
        match self {
            SourceMapKind::Disabled => None,
            SourceMapKind::FullInline => Some("inline-source-map"),
            SourceMapKind::NoSources => Some("nosources-source-map"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerMode {
    /// Write a single HTML report next to the output
    #[default]
    Static,
    /// Serve the report from a local server
    Server,
}

/// A plugin appended by the environment policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "plugin", rename_all = "kebab-case")]
pub enum PluginSpec {
    BundleAnalyzer { mode: AnalyzerMode },
    /// Shared-chunk split; groups in evaluation order
    ChunkGrouping { groups: Vec<CacheGroup> },
}

/// Everything the mode decides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSettings {
    pub mode: Mode,
    pub source_map: SourceMapKind,
    pub minify: Option<MinifyPolicy>,
    pub extra_plugins: Vec<PluginSpec>,
    pub public_path: String,
    pub css: CssOptions,
    pub hot_reload: bool,
}

impl BuildSettings {
    /// The fixed test-mode settings. No flag changes them.
    pub fn test() -> Self {
        Self {
            mode: Mode::Test,
            source_map: SourceMapKind::NoSources,
            minify: None,
            extra_plugins: Vec::new(),
            public_path: "/".to_string(),
            css: CssOptions::for_mode(Mode::Test),
            hot_reload: false,
        }
    }

    pub fn has_analyzer(&self) -> bool {
        self.extra_plugins
            .iter()
            .any(|p| matches!(p, PluginSpec::BundleAnalyzer { .. }))
    }

    /// Compile the chunk-grouping plugin, when the mode carries one.
    pub fn chunk_policy(&self) -> Result<Option<ChunkGroupingPolicy>> {
        self.extra_plugins
            .iter()
            .find_map(|p| match p {
                PluginSpec::ChunkGrouping { groups } => Some(groups),
                _ => None,
            })
            .map(|groups| ChunkGroupingPolicy::from_preference(groups.clone()))
            .transpose()
    }
}

/// The state machine over [`Mode`].
#[derive(Debug, Clone, Default)]
pub struct EnvironmentBuildPolicy {
    /// Preference list, highest first
    cache_groups: Vec<CacheGroup>,
}

impl EnvironmentBuildPolicy {
    /// Cache groups are ranked once by descending priority; equal priorities
    /// keep declaration order.
    pub fn new(mut cache_groups: Vec<CacheGroup>) -> Self {
        cache_groups.sort_by(|a, b| b.priority.cmp(&a.priority));
        Self { cache_groups }
    }

    /// Cache groups already in preference order; priorities are ignored.
    pub fn with_preference(cache_groups: Vec<CacheGroup>) -> Self {
        Self { cache_groups }
    }

    pub fn cache_groups(&self) -> &[CacheGroup] {
        &self.cache_groups
    }

    /// Derive the settings for one build.
    ///
    /// # Example
    ///
    /// ```
    /// use sprout_bundler::policy::{EnvironmentBuildPolicy, SourceMapKind};
    /// use sprout_config::{BuildEnvironment, Mode, application_cache_groups};
    ///
    /// let policy = EnvironmentBuildPolicy::new(application_cache_groups());
    /// let settings = policy.derive(&BuildEnvironment::for_mode(Mode::Production));
    /// assert_eq!(settings.source_map, SourceMapKind::Disabled);
    /// assert!(settings.minify.is_some());
    /// ```
    pub fn derive(&self, env: &BuildEnvironment) -> BuildSettings {
        let settings = match env.mode {
            Mode::Test => BuildSettings::test(),
            Mode::Development => BuildSettings {
                mode: Mode::Development,
                source_map: SourceMapKind::FullInline,
                minify: None,
                extra_plugins: analyzer(env),
                public_path: "/".to_string(),
                css: CssOptions::for_mode(Mode::Development),
                hot_reload: env.hot_reload,
            },
            Mode::Production => {
                let mut extra_plugins = vec![PluginSpec::ChunkGrouping {
                    groups: self.cache_groups.clone(),
                }];
                extra_plugins.extend(analyzer(env));
                BuildSettings {
                    mode: Mode::Production,
                    source_map: SourceMapKind::Disabled,
                    minify: MinifyPolicy::for_mode(Mode::Production),
                    extra_plugins,
                    public_path: "./".to_string(),
                    css: CssOptions::for_mode(Mode::Production),
                    hot_reload: false,
                }
            }
        };

        tracing::info!(
            mode = %settings.mode,
            devtool = settings.source_map.devtool().unwrap_or("none"),
            minify = settings.minify.is_some(),
            plugins = settings.extra_plugins.len(),
            "derived build settings"
        );
        settings
    }
}

fn analyzer(env: &BuildEnvironment) -> Vec<PluginSpec> {
    if env.analyze {
        vec![PluginSpec::BundleAnalyzer {
            mode: AnalyzerMode::Static,
        }]
    } else {
        Vec::new()
    }
}
