//! Global settings shared by every build invocation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default)]
    pub log_level: Option<String>,

    /// Worker count for parallel compaction (defaults to all cores)
    #[serde(default)]
    pub parallel_jobs: Option<usize>,
}
