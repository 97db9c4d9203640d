//! Authored rule records and their one-time validation.
//!
//! Rules arrive as a flat, ordered list of tagged records:
//!
//! ```toml
//! [[rules]]
//! kind = "alias"
//! prefix = "@views"
//! target = "src/views"
//!
//! [[rules]]
//! kind = "cache-group"
//! name = "chunk-libs"
//! test = "[\\\\/]node_modules[\\\\/]"
//! priority = 10
//! chunks = "all"
//! ```
//!
//! [`RuleSet::from_specs`] compiles every pattern and rejects inconsistent
//! tables before anything else runs.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::alias::{APP_ALIASES, AliasTable, RUNTIME_OVERRIDE};
use crate::cache_group::{CacheGroup, application_cache_groups};
use crate::error::{ConfigError, Result};
use crate::loader::{LoaderRule, LoaderSpec, check_partition};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RuleSpec {
    Alias {
        prefix: String,
        target: PathBuf,
        /// Match the bare request only (package entry override)
        #[serde(default)]
        exact: bool,
    },
    Loader(LoaderSpec),
    CacheGroup(CacheGroup),
}

/// The application's alias and cache-group rules. Loader rules for the icon
/// partition are derived from the icon directory instead.
pub fn application_rules() -> Vec<RuleSpec> {
    let aliases = APP_ALIASES.iter().map(|(prefix, dir)| RuleSpec::Alias {
        prefix: (*prefix).to_string(),
        target: PathBuf::from(dir),
        exact: false,
    });
    let (name, target) = RUNTIME_OVERRIDE;
    let runtime = std::iter::once(RuleSpec::Alias {
        prefix: name.to_string(),
        target: PathBuf::from(target),
        exact: true,
    });
    let groups = application_cache_groups()
        .into_iter()
        .map(RuleSpec::CacheGroup);

    aliases.chain(runtime).chain(groups).collect()
}

/// Validated rules, split by kind.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub aliases: AliasTable,
    pub loaders: Vec<LoaderRule>,
    /// Declaration order preserved
    pub cache_groups: Vec<CacheGroup>,
}

impl RuleSet {
    /// Validate `specs`, resolving relative alias targets against `root`.
    pub fn from_specs(root: impl AsRef<Path>, specs: &[RuleSpec]) -> Result<Self> {
        let root = root.as_ref();
        let mut set = RuleSet::default();
        let mut group_names = HashSet::new();

        for spec in specs {
            match spec {
                RuleSpec::Alias {
                    prefix,
                    target,
                    exact: true,
                } => set.aliases.pin(prefix.clone(), target.clone())?,
                RuleSpec::Alias { prefix, target, .. } => {
                    set.aliases.insert(prefix.clone(), root.join(target))?
                }
                RuleSpec::Loader(loader) => {
                    let mut loader = loader.clone();
                    loader.include = loader.include.iter().map(|p| root.join(p)).collect();
                    loader.exclude = loader.exclude.iter().map(|p| root.join(p)).collect();
                    set.loaders.push(LoaderRule::compile(loader)?);
                }
                RuleSpec::CacheGroup(group) => {
                    Regex::new(&group.test)
                        .map_err(|e| ConfigError::invalid_pattern(&group.test, e))?;
                    if group.min_chunks == 0 {
                        return Err(ConfigError::InvalidValue {
                            field: format!("cache-group.{}.min_chunks", group.name),
                            hint: Some("min_chunks must be at least 1".to_string()),
                        });
                    }
                    if !group_names.insert(group.name.clone()) {
                        return Err(ConfigError::DuplicateCacheGroup {
                            name: group.name.clone(),
                        });
                    }
                    set.cache_groups.push(group.clone());
                }
            }
        }

        set.check_loader_partitions(root)?;

        tracing::debug!(
            aliases = set.aliases.len(),
            loaders = set.loaders.len(),
            cache_groups = set.cache_groups.len(),
            "validated rule set"
        );
        Ok(set)
    }

    /// Probe every group of loader rules sharing one extension with a file
    /// inside each include/exclude root and one outside all of them.
    ///
    /// Extensions are read from patterns of the form `\.ext$`; rules with any
    /// other pattern are not probed.
    fn check_loader_partitions(&self, root: &Path) -> Result<()> {
        let mut extensions: Vec<String> = self
            .loaders
            .iter()
            .filter_map(|rule| probe_extension(&rule.spec().test))
            .collect();
        extensions.sort_unstable();
        extensions.dedup();

        for extension in extensions {
            let rules: Vec<LoaderRule> = self
                .loaders
                .iter()
                .filter(|rule| probe_extension(&rule.spec().test).as_deref() == Some(&extension))
                .cloned()
                .collect();
            // A lone rule is an ordinary loader, not a partition.
            if rules.len() < 2 {
                continue;
            }

            let file = format!("__probe__.{extension}");
            let mut probes = vec![root.join("__outside__").join(&file)];
            for rule in &rules {
                for dir in rule.spec().include.iter().chain(&rule.spec().exclude) {
                    probes.push(dir.join(&file));
                }
            }
            check_partition(&extension, &rules, probes.iter().map(PathBuf::as_path))?;
        }
        Ok(())
    }
}

fn probe_extension(test: &str) -> Option<String> {
    let ext = test.strip_prefix(r"\.")?.strip_suffix('$')?;
    (!ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric())).then(|| ext.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::AssetLoaderPartition;

    #[test]
    fn application_rules_validate() {
        let set = RuleSet::from_specs("/app", &application_rules()).unwrap();
        assert_eq!(set.aliases.len(), APP_ALIASES.len());
        assert_eq!(set.cache_groups.len(), 4);
        assert_eq!(
            set.aliases.resolve("@views/a").unwrap(),
            PathBuf::from("/app/src/views/a")
        );
    }

    #[test]
    fn duplicate_cache_group_rejected() {
        let group = CacheGroup::new("chunk-libs", "node_modules", 10);
        let specs = vec![
            RuleSpec::CacheGroup(group.clone()),
            RuleSpec::CacheGroup(group),
        ];
        let err = RuleSet::from_specs("/app", &specs).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateCacheGroup { .. }));
        assert!(err.is_defect());
    }

    #[test]
    fn bad_pattern_rejected() {
        let specs = vec![RuleSpec::CacheGroup(CacheGroup::new("x", "(", 1))];
        let err = RuleSet::from_specs("/app", &specs).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn zero_min_chunks_rejected() {
        let specs = vec![RuleSpec::CacheGroup(
            CacheGroup::new("x", "src", 1).min_chunks(0),
        )];
        assert!(RuleSet::from_specs("/app", &specs).is_err());
    }

    #[test]
    fn icon_partition_rules_pass_probe() {
        let partition = AssetLoaderPartition::new("svg", "src/assets/icons");
        let specs: Vec<RuleSpec> = partition
            .rules()
            .unwrap()
            .into_iter()
            .map(|rule| RuleSpec::Loader(rule.spec().clone()))
            .collect();
        RuleSet::from_specs("/app", &specs).unwrap();
    }

    #[test]
    fn partition_with_missing_exclude_overlaps() {
        let specs = vec![
            RuleSpec::Loader(LoaderSpec {
                test: r"\.svg$".to_string(),
                include: vec![PathBuf::from("src/assets/icons")],
                exclude: Vec::new(),
                loader: "svg-sprite-loader".to_string(),
                options: Default::default(),
            }),
            RuleSpec::Loader(LoaderSpec {
                test: r"\.svg$".to_string(),
                include: Vec::new(),
                exclude: Vec::new(),
                loader: "file-loader".to_string(),
                options: Default::default(),
            }),
        ];
        let err = RuleSet::from_specs("/app", &specs).unwrap_err();
        assert!(matches!(err, ConfigError::OverlappingPartition { .. }));
    }

    #[test]
    fn tagged_records_round_trip_through_toml() {
        let text = r#"
[[rules]]
kind = "alias"
prefix = "@views"
target = "src/views"

[[rules]]
kind = "cache-group"
name = "chunk-libs"
test = "node_modules"
priority = 10
chunks = "all"
"#;
        #[derive(Deserialize)]
        struct Doc {
            rules: Vec<RuleSpec>,
        }
        let doc: Doc = toml::from_str(text).unwrap();
        assert_eq!(doc.rules.len(), 2);
        assert!(matches!(&doc.rules[0], RuleSpec::Alias { exact: false, .. }));
        assert!(matches!(&doc.rules[1], RuleSpec::CacheGroup(g) if g.priority == 10));
    }
}
