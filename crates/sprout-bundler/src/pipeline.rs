//! Ordered configuration stages.
//!
//! Stages run in phase order (lower numbers first); within a phase they keep
//! registration order. The environment stage sits in the last phase so it
//! sees the finished alias and loader wiring.

use std::path::{Path, PathBuf};

use sprout_config::{
    AliasTable, AssetLoaderPartition, BuildEnvironment, ContextReplacement, LoaderRule,
    ScriptRule, SproutConfig, check_partition,
};

use crate::config::{BuildConfig, ContextRule, ModuleRule};
use crate::error::{BuildError, Result};
use crate::policy::{BuildSettings, EnvironmentBuildPolicy};

/// Stage execution phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StagePhase {
    /// Module resolution: aliases, symlinks, context restrictions
    Resolve = 10,

    /// Module rules
    Loaders = 20,

    /// Mode-dependent settings and plugins (always last)
    Environment = 100,
}

/// One transformation of the build configuration.
pub trait BuildStage {
    fn name(&self) -> &'static str;

    fn phase(&self) -> StagePhase {
        StagePhase::Loaders
    }

    fn apply(&self, config: BuildConfig) -> Result<BuildConfig>;
}

/// Installs the alias table and the locale context restriction.
pub struct ResolutionStage {
    aliases: AliasTable,
    contexts: Vec<ContextReplacement>,
}

impl ResolutionStage {
    pub fn new(aliases: AliasTable, contexts: Vec<ContextReplacement>) -> Self {
        Self { aliases, contexts }
    }
}

impl BuildStage for ResolutionStage {
    fn name(&self) -> &'static str {
        "resolution"
    }

    fn phase(&self) -> StagePhase {
        StagePhase::Resolve
    }

    fn apply(&self, mut config: BuildConfig) -> Result<BuildConfig> {
        config.resolution.aliases = self.aliases.clone();
        config.resolution.symlinks = true;
        config.resolution.contexts = self
            .contexts
            .iter()
            .map(|c| ContextRule {
                resource: c.resource_pattern().to_string(),
                keep: c.keep_pattern().to_string(),
            })
            .collect();
        Ok(config)
    }
}

/// Registers the script rule, the icon partition and any authored loaders.
pub struct LoaderStage {
    script: ScriptRule,
    partition: AssetLoaderPartition,
    authored: Vec<LoaderRule>,
}

impl LoaderStage {
    pub fn new(
        script: ScriptRule,
        partition: AssetLoaderPartition,
        authored: Vec<LoaderRule>,
    ) -> Self {
        Self {
            script,
            partition,
            authored,
        }
    }

    /// Every rule serving the partitioned extension must still split it
    /// cleanly once authored rules are added.
    fn check_partition(&self, root: &Path, rules: &[LoaderRule]) -> Result<()> {
        let probe = format!("__probe__.{}", self.partition.extension);
        let probes = [
            self.partition.icon_dir.join(&probe),
            self.partition.icon_dir.join("nested").join(&probe),
            root.join("__outside__").join(&probe),
        ];
        let serving: Vec<LoaderRule> = rules
            .iter()
            .filter(|rule| probes.iter().any(|p| rule.matches(p)))
            .cloned()
            .collect();
        check_partition(
            &self.partition.extension,
            &serving,
            probes.iter().map(PathBuf::as_path),
        )?;
        Ok(())
    }
}

impl BuildStage for LoaderStage {
    fn name(&self) -> &'static str {
        "loaders"
    }

    fn apply(&self, mut config: BuildConfig) -> Result<BuildConfig> {
        let mut rules: Vec<LoaderRule> = self.partition.rules()?.into();
        rules.extend(self.authored.iter().cloned());
        self.check_partition(&config.root, &rules)?;

        config.module_rules.push(ModuleRule::Script {
            test: self.script.test_pattern().to_string(),
            exclude: self.script.exclude_pattern().to_string(),
            loader: self.script.loader().to_string(),
            options: self.script.options(),
        });
        config
            .module_rules
            .extend(rules.iter().map(|rule| ModuleRule::Asset(rule.spec().clone())));
        Ok(config)
    }
}

/// Applies the derived [`BuildSettings`]. The only stage that touches
/// mode-dependent fields or appends plugins.
pub struct EnvironmentStage {
    settings: BuildSettings,
}

impl EnvironmentStage {
    pub fn new(policy: &EnvironmentBuildPolicy, env: &BuildEnvironment) -> Self {
        Self {
            settings: policy.derive(env),
        }
    }

    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }
}

impl BuildStage for EnvironmentStage {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn phase(&self) -> StagePhase {
        StagePhase::Environment
    }

    fn apply(&self, mut config: BuildConfig) -> Result<BuildConfig> {
        let settings = &self.settings;
        config.mode = settings.mode;
        config.devtool = settings.source_map;
        config.output.public_path = settings.public_path.clone();
        config.css = settings.css.clone();
        config.dev_server.hot = settings.hot_reload;
        config.optimization.minimizer = settings.minify.clone();
        config.optimization.split_chunks = settings
            .chunk_policy()?
            .map(|policy| policy.groups().cloned().collect());
        config.plugins.extend(settings.extra_plugins.iter().cloned());
        Ok(config)
    }
}

/// Stage runner.
#[derive(Default)]
pub struct BuildPipeline {
    stages: Vec<Box<dyn BuildStage>>,
}

impl BuildPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The application pipeline for `project` under `env`.
    pub fn standard(
        root: impl AsRef<Path>,
        project: &SproutConfig,
        env: &BuildEnvironment,
    ) -> Result<Self> {
        let root = root.as_ref();
        let rules = project.rule_set(root)?;
        let policy = EnvironmentBuildPolicy::new(rules.cache_groups.clone());

        let mut pipeline = Self::new();
        pipeline.add(EnvironmentStage::new(&policy, env));
        pipeline.add(LoaderStage::new(
            ScriptRule::new()?,
            project.icon_partition(root),
            rules.loaders,
        ));
        pipeline.add(ResolutionStage::new(
            rules.aliases,
            vec![ContextReplacement::locales()?],
        ));
        Ok(pipeline)
    }

    pub fn add<S: BuildStage + 'static>(&mut self, stage: S) {
        self.stages.push(Box::new(stage));
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage names in execution order.
    pub fn order(&self) -> Vec<&'static str> {
        let mut stages: Vec<_> = self.stages.iter().collect();
        stages.sort_by_key(|s| s.phase());
        stages.iter().map(|s| s.name()).collect()
    }

    pub fn run(mut self, config: BuildConfig) -> Result<BuildConfig> {
        self.stages.sort_by_key(|s| s.phase());
        self.stages.into_iter().try_fold(config, |config, stage| {
            let name = stage.name();
            let config = stage.apply(config).map_err(|e| match e {
                BuildError::Config(_) | BuildError::Stage { .. } => e,
                other => BuildError::Stage {
                    stage: name,
                    message: other.to_string(),
                },
            })?;
            tracing::debug!(stage = name, "stage applied");
            Ok(config)
        })
    }
}

/// Build the full configuration for `project` under `env`.
///
/// # Example
///
/// ```
/// use sprout_bundler::configure;
/// use sprout_config::{BuildEnvironment, Mode, SproutConfig};
///
/// let env = BuildEnvironment::for_mode(Mode::Production);
/// let config = configure("/app", &SproutConfig::default(), &env).unwrap();
/// assert_eq!(config.output.public_path, "./");
/// assert!(config.optimization.split_chunks.is_some());
/// ```
pub fn configure(
    root: impl AsRef<Path>,
    project: &SproutConfig,
    env: &BuildEnvironment,
) -> Result<BuildConfig> {
    let root = root.as_ref();
    let pipeline = BuildPipeline::standard(root, project, env)?;
    let config = pipeline.run(BuildConfig::new(root, project, env))?;
    tracing::info!(
        mode = %config.mode,
        rules = config.module_rules.len(),
        plugins = config.plugins.len(),
        "build configuration ready"
    );
    Ok(config)
}
