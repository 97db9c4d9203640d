//! Loader rules and the icon-sprite partition.
//!
//! One asset extension (`.svg`) is served by two pipelines. Files under the
//! icon directory become sprite symbols; everything else is emitted as a
//! plain file. The two rules must partition the file universe.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use path_clean::PathClean;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{ConfigError, Result};

pub const ICON_DIR: &str = "src/assets/icons";
pub const SPRITE_LOADER: &str = "svg-sprite-loader";
pub const FILE_LOADER: &str = "file-loader";
pub const SCRIPT_LOADER: &str = "babel-loader";

/// Declarative loader rule as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderSpec {
    /// Regex over the file path
    pub test: String,
    #[serde(default)]
    pub include: Vec<PathBuf>,
    #[serde(default)]
    pub exclude: Vec<PathBuf>,
    pub loader: String,
    #[serde(default)]
    pub options: IndexMap<String, Value>,
}

/// A loader rule with its pattern compiled.
#[derive(Debug, Clone)]
pub struct LoaderRule {
    spec: LoaderSpec,
    test: Regex,
}

impl LoaderRule {
    pub fn compile(spec: LoaderSpec) -> Result<Self> {
        let test = Regex::new(&spec.test).map_err(|e| ConfigError::invalid_pattern(&spec.test, e))?;
        let spec = LoaderSpec {
            include: spec.include.iter().map(|p| p.clean()).collect(),
            exclude: spec.exclude.iter().map(|p| p.clean()).collect(),
            ..spec
        };
        Ok(Self { spec, test })
    }

    pub fn spec(&self) -> &LoaderSpec {
        &self.spec
    }

    pub fn loader(&self) -> &str {
        &self.spec.loader
    }

    /// Test, include and exclude conditions, evaluated the way module rules are.
    pub fn matches(&self, path: &Path) -> bool {
        if !self.test.is_match(&path.to_string_lossy()) {
            return false;
        }
        let path = path.clean();
        let included =
            self.spec.include.is_empty() || self.spec.include.iter().any(|root| path.starts_with(root));
        included && !self.spec.exclude.iter().any(|root| path.starts_with(root))
    }
}

/// Which pipeline a special asset takes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "pipeline", rename_all = "snake_case")]
pub enum AssetPipeline {
    /// Inlined into the runtime sprite, referenced by `symbol_id`
    Sprite { symbol_id: String },
    Default,
}

/// Splits one asset extension into sprite and default pipelines by directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetLoaderPartition {
    pub extension: String,
    pub icon_dir: PathBuf,
}

impl AssetLoaderPartition {
    pub fn new(extension: impl Into<String>, icon_dir: impl Into<PathBuf>) -> Self {
        Self {
            extension: extension.into(),
            icon_dir: icon_dir.into().clean(),
        }
    }

    /// The application's svg partition rooted at `root`.
    pub fn application(root: impl AsRef<Path>) -> Self {
        Self::new("svg", root.as_ref().join(ICON_DIR))
    }

    /// Whether `path` carries the partitioned extension at all. Matching is
    /// case-sensitive, like the rules' test pattern.
    pub fn handles(&self, path: &Path) -> bool {
        has_extension(path, &self.extension)
    }

    /// Route a file to exactly one pipeline.
    ///
    /// # Example
    ///
    /// ```
    /// use sprout_config::{AssetLoaderPartition, AssetPipeline};
    /// use std::path::Path;
    ///
    /// let partition = AssetLoaderPartition::application("/app");
    /// assert_eq!(
    ///     partition.classify(Path::new("/app/src/assets/icons/user.svg")),
    ///     AssetPipeline::Sprite { symbol_id: "icon-user".into() }
    /// );
    /// assert_eq!(
    ///     partition.classify(Path::new("/app/src/assets/logo.svg")),
    ///     AssetPipeline::Default
    /// );
    /// ```
    pub fn classify(&self, path: &Path) -> AssetPipeline {
        if path.clean().starts_with(&self.icon_dir) {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            AssetPipeline::Sprite {
                symbol_id: format!("icon-{name}"),
            }
        } else {
            AssetPipeline::Default
        }
    }

    /// The two loader rules implementing this partition.
    pub fn rules(&self) -> Result<[LoaderRule; 2]> {
        let test = format!(r"\.{}$", regex::escape(&self.extension));
        let sprite = LoaderRule::compile(LoaderSpec {
            test: test.clone(),
            include: vec![self.icon_dir.clone()],
            exclude: Vec::new(),
            loader: SPRITE_LOADER.to_string(),
            options: IndexMap::from([("symbolId".to_string(), json!("icon-[name]"))]),
        })?;
        let default = LoaderRule::compile(LoaderSpec {
            test,
            include: Vec::new(),
            exclude: vec![self.icon_dir.clone()],
            loader: FILE_LOADER.to_string(),
            options: IndexMap::from([("name".to_string(), json!("img/[name].[hash:8].[ext]"))]),
        })?;
        Ok([sprite, default])
    }
}

/// Check that `rules` send every file in `paths` with `extension` through
/// exactly one rule.
///
/// Totality cannot be proven for an infinite universe, so this is run over
/// the files actually seen during resolution.
pub fn check_partition<'a>(
    extension: &str,
    rules: &[LoaderRule],
    paths: impl IntoIterator<Item = &'a Path>,
) -> Result<()> {
    for path in paths {
        if !has_extension(path, extension) {
            continue;
        }

        match rules.iter().filter(|rule| rule.matches(path)).count() {
            1 => {}
            0 => {
                return Err(ConfigError::UncoveredPartition {
                    extension: extension.to_string(),
                    path: path.to_path_buf(),
                });
            }
            _ => {
                return Err(ConfigError::OverlappingPartition {
                    extension: extension.to_string(),
                    path: path.to_path_buf(),
                });
            }
        }
    }
    Ok(())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

/// Script transpile rule: `.js`/`.jsx` sources except the helper runtimes
/// the transpiler itself injects.
#[derive(Debug, Clone)]
pub struct ScriptRule {
    test: Regex,
    exclude: Regex,
}

impl ScriptRule {
    pub fn new() -> Result<Self> {
        let test = r"\.(js|jsx)$";
        let exclude = r"@babel(?:/|\\{1,2})runtime|core-js";
        Ok(Self {
            test: Regex::new(test).map_err(|e| ConfigError::invalid_pattern(test, e))?,
            exclude: Regex::new(exclude).map_err(|e| ConfigError::invalid_pattern(exclude, e))?,
        })
    }

    /// Whether `path` goes through the transpiler.
    pub fn applies(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.test.is_match(&path) && !self.exclude.is_match(&path)
    }

    pub fn loader(&self) -> &'static str {
        SCRIPT_LOADER
    }

    pub fn test_pattern(&self) -> &str {
        self.test.as_str()
    }

    pub fn exclude_pattern(&self) -> &str {
        self.exclude.as_str()
    }

    /// Transpiler options: no compaction, cached, no maps.
    pub fn options(&self) -> IndexMap<String, Value> {
        IndexMap::from([
            ("babelrc".to_string(), json!(false)),
            ("configFile".to_string(), json!("babel.config.js")),
            ("compact".to_string(), json!(false)),
            ("cacheDirectory".to_string(), json!(true)),
            ("sourceMaps".to_string(), json!(false)),
        ])
    }
}
