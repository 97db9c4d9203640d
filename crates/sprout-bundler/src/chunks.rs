//! Shared-chunk grouping.
//!
//! Given the module graph the bundler produced, every module is offered to the
//! cache groups in preference order. The first group whose pattern matches the
//! module path, and whose share threshold the module meets, claims it into a
//! named shared chunk. Unclaimed modules stay in the chunks that reference
//! them.
//!
//! ```text
//! node_modules/vant/lib/button.js   -> chunk-vantUI   (20)
//! node_modules/axios/index.js       -> chunk-libs     (10)
//! src/utils/format.js  (3 chunks)   -> chunk-utils    (8)
//! src/views/hello/index.vue (1)     -> hello          (natural)
//! ```

use std::collections::BTreeSet;
use std::path::PathBuf;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sprout_config::{CacheGroup, ChunkScope, ConfigError};

use crate::error::{BuildError, Result};

/// How a chunk of the input graph is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    /// Loaded with an entry point
    Initial,
    /// Loaded on demand (lazy routes)
    Async,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceChunk {
    pub name: String,
    pub kind: ChunkKind,
}

/// A module and the chunks that reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub path: PathBuf,
    pub chunks: Vec<String>,
}

/// Module graph as handed over by the bundler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleGraph {
    pub chunks: Vec<SourceChunk>,
    pub modules: Vec<ModuleRecord>,
}

impl ModuleGraph {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn chunk(mut self, name: impl Into<String>, kind: ChunkKind) -> Self {
        self.chunks.push(SourceChunk {
            name: name.into(),
            kind,
        });
        self
    }

    pub fn module<I, S>(mut self, path: impl Into<PathBuf>, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules.push(ModuleRecord {
            path: path.into(),
            chunks: chunks.into_iter().map(Into::into).collect(),
        });
        self
    }

    fn kind_of(&self, chunk: &str) -> Option<ChunkKind> {
        self.chunks.iter().find(|c| c.name == chunk).map(|c| c.kind)
    }
}

#[derive(Debug, Clone)]
struct CompiledGroup {
    group: CacheGroup,
    test: Regex,
}

impl CompiledGroup {
    fn in_scope(&self, kind: ChunkKind) -> bool {
        match self.group.chunks {
            ChunkScope::All => true,
            ChunkScope::Async => kind == ChunkKind::Async,
            ChunkScope::Initial => kind == ChunkKind::Initial,
        }
    }
}

/// Ordered preference list of cache groups.
#[derive(Debug, Clone)]
pub struct ChunkGroupingPolicy {
    groups: Vec<CompiledGroup>,
}

impl ChunkGroupingPolicy {
    /// Order `groups` by descending priority. Equal priorities keep their
    /// declaration order.
    pub fn from_cache_groups(mut groups: Vec<CacheGroup>) -> Result<Self> {
        groups.sort_by(|a, b| b.priority.cmp(&a.priority));
        Self::from_preference(groups)
    }

    /// Use `groups` exactly in the given order; the first eligible group wins.
    /// Numeric priorities are ignored.
    pub fn from_preference(groups: Vec<CacheGroup>) -> Result<Self> {
        let groups = groups
            .into_iter()
            .map(|group| {
                let test = Regex::new(&group.test)
                    .map_err(|e| ConfigError::InvalidPattern {
                        pattern: group.test.clone(),
                        source: e,
                    })?;
                Ok(CompiledGroup { group, test })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { groups })
    }

    /// Group names in evaluation order.
    pub fn preference(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.group.name.as_str())
    }

    pub fn groups(&self) -> impl Iterator<Item = &CacheGroup> {
        self.groups.iter().map(|g| &g.group)
    }

    /// The group claiming `module`, if any.
    pub fn assign(&self, graph: &ModuleGraph, module: &ModuleRecord) -> Result<Option<&str>> {
        let mut kinds = Vec::with_capacity(module.chunks.len());
        let mut seen = BTreeSet::new();
        for chunk in &module.chunks {
            let kind = graph
                .kind_of(chunk)
                .ok_or_else(|| BuildError::UnknownChunk {
                    module: module.path.clone(),
                    chunk: chunk.clone(),
                })?;
            if seen.insert(chunk.as_str()) {
                kinds.push(kind);
            }
        }

        let path = module.path.to_string_lossy();
        let claimed = self.groups.iter().find(|g| {
            let shared = kinds.iter().filter(|&&kind| g.in_scope(kind)).count();
            shared >= g.group.min_chunks && g.test.is_match(&path)
        });
        Ok(claimed.map(|g| g.group.name.as_str()))
    }

    /// Partition the graph's modules into shared and natural chunks.
    pub fn split(&self, graph: &ModuleGraph) -> Result<ChunkLayout> {
        let mut layout = ChunkLayout::default();
        for chunk in &graph.chunks {
            layout.natural.entry(chunk.name.clone()).or_default();
        }

        for module in &graph.modules {
            match self.assign(graph, module)? {
                Some(group) => {
                    tracing::debug!(module = %module.path.display(), group, "claimed by cache group");
                    let shared = layout
                        .shared
                        .entry(group.to_string())
                        .or_insert_with(|| SharedChunk {
                            name: group.to_string(),
                            modules: Vec::new(),
                            parents: BTreeSet::new(),
                        });
                    shared.modules.push(module.path.clone());
                    shared.parents.extend(module.chunks.iter().cloned());
                }
                None => {
                    for chunk in &module.chunks {
                        let natural = layout.natural.entry(chunk.clone()).or_default();
                        if !natural.contains(&module.path) {
                            natural.push(module.path.clone());
                        }
                    }
                }
            }
        }

        // Shared chunks come out in preference order, modules sorted by path.
        let mut ordered = IndexMap::new();
        for name in self.preference() {
            if let Some(mut chunk) = layout.shared.swap_remove(name) {
                chunk.modules.sort();
                ordered.insert(name.to_string(), chunk);
            }
        }
        layout.shared = ordered;
        for modules in layout.natural.values_mut() {
            modules.sort();
        }

        tracing::info!(
            shared = layout.shared.len(),
            natural = layout.natural.len(),
            "chunk layout computed"
        );
        Ok(layout)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedChunk {
    pub name: String,
    pub modules: Vec<PathBuf>,
    /// Source chunks that now load this shared chunk
    pub parents: BTreeSet<String>,
}

/// Resulting chunk assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkLayout {
    pub shared: IndexMap<String, SharedChunk>,
    pub natural: IndexMap<String, Vec<PathBuf>>,
}

impl ChunkLayout {
    /// Name of the chunk holding `module`: its shared chunk, or the first
    /// natural chunk listing it.
    pub fn chunk_of(&self, module: &std::path::Path) -> Option<&str> {
        self.shared
            .values()
            .find(|c| c.modules.iter().any(|m| m == module))
            .map(|c| c.name.as_str())
            .or_else(|| {
                self.natural
                    .iter()
                    .find(|(_, modules)| modules.iter().any(|m| m == module))
                    .map(|(name, _)| name.as_str())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_config::application_cache_groups;
    use std::path::Path;

    fn app_policy() -> ChunkGroupingPolicy {
        ChunkGroupingPolicy::from_cache_groups(application_cache_groups()).unwrap()
    }

    #[test]
    fn preference_follows_priority() {
        let names: Vec<_> = app_policy().preference().map(str::to_string).collect();
        assert_eq!(
            names,
            ["chunk-vantUI", "chunk-libs", "chunk-utils", "chunk-commons"]
        );
    }

    #[test]
    fn equal_priorities_keep_declaration_order() {
        let policy = ChunkGroupingPolicy::from_cache_groups(vec![
            CacheGroup::new("first", "src", 5).chunks(ChunkScope::All),
            CacheGroup::new("second", "src", 5).chunks(ChunkScope::All),
        ])
        .unwrap();
        let graph = ModuleGraph::default()
            .chunk("app", ChunkKind::Initial)
            .module("/app/src/a.js", ["app"]);
        assert_eq!(
            policy.assign(&graph, &graph.modules[0]).unwrap(),
            Some("first")
        );
    }

    #[test]
    fn ui_library_beats_generic_third_party() {
        let graph = ModuleGraph::default()
            .chunk("app", ChunkKind::Initial)
            .module("/app/node_modules/vant/lib/button/index.js", ["app"])
            .module("/app/node_modules/axios/index.js", ["app"]);
        let layout = app_policy().split(&graph).unwrap();
        assert_eq!(
            layout.chunk_of(Path::new("/app/node_modules/vant/lib/button/index.js")),
            Some("chunk-vantUI")
        );
        assert_eq!(
            layout.chunk_of(Path::new("/app/node_modules/axios/index.js")),
            Some("chunk-libs")
        );
    }

    #[test]
    fn single_use_source_stays_in_natural_chunk() {
        let graph = ModuleGraph::default()
            .chunk("app", ChunkKind::Initial)
            .chunk("hello", ChunkKind::Async)
            .module("/app/src/views/hello/index.vue", ["hello"]);
        let layout = app_policy().split(&graph).unwrap();
        assert!(layout.shared.is_empty());
        assert_eq!(
            layout.chunk_of(Path::new("/app/src/views/hello/index.vue")),
            Some("hello")
        );
    }

    #[test]
    fn async_scope_ignores_initial_references() {
        let policy = ChunkGroupingPolicy::from_cache_groups(vec![
            CacheGroup::new("lazy-shared", "src", 1).min_chunks(2),
        ])
        .unwrap();
        let graph = ModuleGraph::default()
            .chunk("app", ChunkKind::Initial)
            .chunk("admin", ChunkKind::Initial)
            .chunk("hello", ChunkKind::Async)
            .module("/app/src/x.js", ["app", "admin", "hello"]);
        assert_eq!(policy.assign(&graph, &graph.modules[0]).unwrap(), None);
    }

    #[test]
    fn duplicate_references_count_once() {
        let graph = ModuleGraph::default()
            .chunk("app", ChunkKind::Initial)
            .module("/app/src/utils/a.js", ["app", "app"]);
        assert_eq!(app_policy().assign(&graph, &graph.modules[0]).unwrap(), None);
    }

    #[test]
    fn unknown_chunk_is_an_error() {
        let graph = ModuleGraph::default().module("/app/src/a.js", ["ghost"]);
        let err = app_policy().split(&graph).unwrap_err();
        assert!(matches!(err, BuildError::UnknownChunk { .. }));
    }

    #[test]
    fn windows_separators_match() {
        let graph = ModuleGraph::default()
            .chunk("app", ChunkKind::Initial)
            .module(r"C:\app\node_modules\vant\es\cell.js", ["app"]);
        assert_eq!(
            app_policy().assign(&graph, &graph.modules[0]).unwrap(),
            Some("chunk-vantUI")
        );
    }
}
