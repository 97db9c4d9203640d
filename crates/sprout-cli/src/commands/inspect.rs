//! `sprout inspect`

use std::path::Path;

use sprout_bundler::{EnvironmentBuildPolicy, configure};

use super::{environment, load_project, print_json};
use crate::cli::InspectArgs;
use crate::error::Result;

pub fn execute(root: &Path, args: InspectArgs) -> Result<()> {
    let env = environment(args.mode)?;
    let project = load_project(root)?;

    if args.settings {
        let rules = project.rule_set(root)?;
        let settings = EnvironmentBuildPolicy::new(rules.cache_groups).derive(&env);
        return print_json(&settings);
    }

    let config = configure(root, &project, &env)?;
    print_json(&config)
}
