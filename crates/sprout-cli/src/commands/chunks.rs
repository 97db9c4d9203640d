//! `sprout chunks <graph>`

use std::fs;
use std::path::Path;

use sprout_bundler::{EnvironmentBuildPolicy, ModuleGraph};
use sprout_config::{BuildEnvironment, Mode};

use super::{load_project, print_json};
use crate::cli::ChunksArgs;
use crate::error::{CliError, Result};

/// Split `args.graph` with the production chunk policy.
///
/// The graph path is taken as given, relative to the working directory;
/// `root` only locates the project config.
pub fn execute(root: &Path, args: ChunksArgs) -> Result<()> {
    let graph_path = args.graph;
    if !graph_path.is_file() {
        return Err(CliError::FileNotFound(graph_path));
    }
    let graph = ModuleGraph::from_json(&fs::read_to_string(&graph_path)?)?;

    let project = load_project(root)?;
    let rules = project.rule_set(root)?;
    let settings = EnvironmentBuildPolicy::new(rules.cache_groups)
        .derive(&BuildEnvironment::for_mode(Mode::Production));

    let layout = match settings.chunk_policy()? {
        Some(policy) => policy.split(&graph)?,
        None => Default::default(),
    };
    tracing::debug!(
        modules = graph.modules.len(),
        shared = layout.shared.len(),
        "split module graph"
    );
    print_json(&layout)
}
