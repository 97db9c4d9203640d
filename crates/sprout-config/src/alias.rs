//! Symbolic path prefixes for module resolution.
//!
//! Every import in the application's views and components goes through one of
//! these prefixes:
//!
//! ```text
//! import Hello from '@views/hello/index'
//! //                 ^^^^^^ -> <root>/src/views
//! ```
//!
//! Prefixes are disjoint by convention. A prefix only matches when the request
//! is exactly the prefix or continues with `/`, so `@` never captures
//! `@views/...`.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use path_clean::PathClean;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Directory aliases of the application, relative to the project root.
pub const APP_ALIASES: [(&str, &str); 9] = [
    ("@", "src"),
    ("@assets", "src/assets"),
    ("@components", "src/components"),
    ("@views", "src/views"),
    ("@utils", "src/utils"),
    ("@config", "src/config"),
    ("@layouts", "src/layouts"),
    ("@store", "src/store"),
    ("@mixins", "src/mixins"),
];

/// Bare runtime-library request pinned to its full (compiler-included) build.
pub const RUNTIME_OVERRIDE: (&str, &str) = ("vue", "vue/dist/vue.esm.js");

/// One directory alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub prefix: String,
    pub target: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AliasTable {
    entries: IndexMap<String, PathBuf>,
    /// Exact-match overrides for bare package requests
    overrides: IndexMap<String, PathBuf>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The application's table: directory aliases under `root` plus the
    /// runtime-library override.
    pub fn application(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let mut table = Self::new();
        for (prefix, dir) in APP_ALIASES {
            table.insert(prefix, root.join(dir))?;
        }
        let (name, target) = RUNTIME_OVERRIDE;
        table.pin(name, target)?;
        Ok(table)
    }

    /// Register a directory alias. Prefixes must be unique.
    pub fn insert(&mut self, prefix: impl Into<String>, target: impl Into<PathBuf>) -> Result<()> {
        let prefix = prefix.into();
        let trimmed = prefix.trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "alias.prefix".to_string(),
                hint: Some("alias prefixes cannot be empty".to_string()),
            });
        }
        if self.entries.contains_key(trimmed) {
            return Err(ConfigError::DuplicateAlias { prefix });
        }
        self.entries
            .insert(trimmed.to_string(), target.into().clean());
        Ok(())
    }

    /// Pin a bare package request to a specific entry file.
    pub fn pin(&mut self, name: impl Into<String>, target: impl Into<PathBuf>) -> Result<()> {
        let name = name.into();
        if self.overrides.contains_key(&name) {
            return Err(ConfigError::DuplicateAlias { prefix: name });
        }
        self.overrides.insert(name, target.into());
        Ok(())
    }

    /// Substitute the registered prefix of `request` with its target directory.
    ///
    /// # Example
    ///
    /// ```
    /// use sprout_config::AliasTable;
    /// use std::path::PathBuf;
    ///
    /// let table = AliasTable::application("/app").unwrap();
    /// assert_eq!(
    ///     table.resolve("@views/hello/index").unwrap(),
    ///     PathBuf::from("/app/src/views/hello/index")
    /// );
    /// assert!(table.resolve("~/nowhere").is_err());
    /// ```
    pub fn resolve(&self, request: &str) -> Result<PathBuf> {
        self.try_resolve(request)
            .ok_or_else(|| ConfigError::UnresolvedAlias {
                request: request.to_string(),
            })
    }

    /// Like [`resolve`](Self::resolve), returning `None` for requests that are
    /// not aliased at all (relative imports, ordinary packages).
    ///
    /// The longest matching prefix wins, and the joined path is cleaned.
    pub fn try_resolve(&self, request: &str) -> Option<PathBuf> {
        if let Some(target) = self.overrides.get(request) {
            return Some(target.clone());
        }

        self.entries
            .iter()
            .filter_map(|(prefix, target)| {
                let rest = request.strip_prefix(prefix.as_str())?;
                if rest.is_empty() {
                    Some((prefix.len(), target.clone()))
                } else {
                    let rest = rest.strip_prefix('/')?;
                    Some((prefix.len(), target.join(rest).clean()))
                }
            })
            .max_by_key(|(len, _)| *len)
            .map(|(_, path)| path)
    }

    pub fn target(&self, prefix: &str) -> Option<&Path> {
        self.entries.get(prefix).map(PathBuf::as_path)
    }

    pub fn entries(&self) -> impl Iterator<Item = AliasEntry> + '_ {
        self.entries.iter().map(|(prefix, target)| AliasEntry {
            prefix: prefix.clone(),
            target: target.clone(),
        })
    }

    pub fn overrides(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.overrides
            .iter()
            .map(|(name, target)| (name.as_str(), target.as_path()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_exact_prefix() {
        let table = AliasTable::application("/app").unwrap();
        assert_eq!(table.resolve("@").unwrap(), PathBuf::from("/app/src"));
        assert_eq!(
            table.resolve("@store").unwrap(),
            PathBuf::from("/app/src/store")
        );
    }

    #[test]
    fn root_alias_does_not_capture_longer_prefixes() {
        let table = AliasTable::application("/app").unwrap();
        assert_eq!(
            table.resolve("@components/Button.vue").unwrap(),
            PathBuf::from("/app/src/components/Button.vue")
        );
        assert_eq!(
            table.resolve("@/main.js").unwrap(),
            PathBuf::from("/app/src/main.js")
        );
    }

    #[test]
    fn longest_prefix_wins_and_result_is_cleaned() {
        let mut table = AliasTable::new();
        table.insert("@views", "/app/src/views").unwrap();
        table.insert("@views/admin", "/admin/views").unwrap();
        assert_eq!(
            table.resolve("@views/admin/users").unwrap(),
            PathBuf::from("/admin/views/users")
        );
        assert_eq!(
            table.resolve("@views/hello/../home/./index").unwrap(),
            PathBuf::from("/app/src/views/home/index")
        );
    }

    #[test]
    fn prefix_needs_separator() {
        let table = AliasTable::application("/app").unwrap();
        assert!(matches!(
            table.resolve("@viewsx/a"),
            Err(ConfigError::UnresolvedAlias { .. })
        ));
    }

    #[test]
    fn runtime_override_is_exact() {
        let table = AliasTable::application("/app").unwrap();
        assert_eq!(
            table.resolve("vue").unwrap(),
            PathBuf::from("vue/dist/vue.esm.js")
        );
        assert!(table.try_resolve("vue-router").is_none());
        assert!(table.try_resolve("vue/types").is_none());
    }

    #[test]
    fn duplicate_prefix_is_a_defect() {
        let mut table = AliasTable::new();
        table.insert("@utils", "/a").unwrap();
        let err = table.insert("@utils", "/b").unwrap_err();
        assert!(err.is_defect());
    }

    #[test]
    fn trailing_slash_prefix_is_normalised() {
        let mut table = AliasTable::new();
        table.insert("@lib/", "/vendor/lib").unwrap();
        assert_eq!(
            table.resolve("@lib/x.js").unwrap(),
            PathBuf::from("/vendor/lib/x.js")
        );
    }
}
