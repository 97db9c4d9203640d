use serde::{Deserialize, Serialize};

/// Which chunks count toward a cache group's share threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkScope {
    /// Entry and lazily-loaded chunks alike
    All,
    /// Only lazily-loaded chunks
    #[default]
    Async,
    /// Only entry chunks
    Initial,
}

/// Named rule claiming matching modules into a shared chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheGroup {
    pub name: String,

    /// Regex over the module's resolved path
    pub test: String,

    /// Higher wins; ties keep declaration order
    #[serde(default)]
    pub priority: i32,

    #[serde(default)]
    pub chunks: ChunkScope,

    /// Minimum number of in-scope chunks that must reference the module
    #[serde(default = "default_min_chunks")]
    pub min_chunks: usize,
}

fn default_min_chunks() -> usize {
    1
}

impl CacheGroup {
    pub fn new(name: impl Into<String>, test: impl Into<String>, priority: i32) -> Self {
        Self {
            name: name.into(),
            test: test.into(),
            priority,
            chunks: ChunkScope::default(),
            min_chunks: default_min_chunks(),
        }
    }

    pub fn chunks(mut self, scope: ChunkScope) -> Self {
        self.chunks = scope;
        self
    }

    pub fn min_chunks(mut self, min: usize) -> Self {
        self.min_chunks = min;
        self
    }
}

/// The application's shared-chunk layout, in authoring order.
///
/// Evaluation order comes from priority, not from this order: the UI
/// library bucket (20) beats the generic third-party bucket (10), which
/// beats first-party utilities (8) and the first-party catch-all (4).
pub fn application_cache_groups() -> Vec<CacheGroup> {
    vec![
        CacheGroup::new("chunk-utils", r"[\\/]src[\\/](components|utils|services)", 8)
            .chunks(ChunkScope::All)
            .min_chunks(2),
        CacheGroup::new("chunk-commons", r"[\\/]src", 4)
            .chunks(ChunkScope::All)
            .min_chunks(2),
        CacheGroup::new("chunk-libs", r"[\\/]node_modules[\\/]", 10).chunks(ChunkScope::All),
        CacheGroup::new("chunk-vantUI", r"[\\/]node_modules[\\/]vant[\\/]", 20)
            .chunks(ChunkScope::All),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_defaults() {
        let group: CacheGroup =
            serde_json::from_value(serde_json::json!({ "name": "x", "test": "src" })).unwrap();
        assert_eq!(group.priority, 0);
        assert_eq!(group.chunks, ChunkScope::Async);
        assert_eq!(group.min_chunks, 1);
    }

    #[test]
    fn application_groups_have_unique_names() {
        let groups = application_cache_groups();
        let mut names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), groups.len());
    }
}
