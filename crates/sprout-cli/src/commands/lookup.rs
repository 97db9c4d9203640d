//! `sprout resolve <request>` and `sprout route <path>`

use std::path::Path;
use std::sync::Arc;

use sprout_router::{Navigator, application_table};

use super::{load_project, print_json};
use crate::cli::{ResolveArgs, RouteArgs};
use crate::error::Result;

pub fn resolve_execute(root: &Path, args: ResolveArgs) -> Result<()> {
    let rules = load_project(root)?.rule_set(root)?;
    let resolved = rules.aliases.resolve(&args.request)?;
    println!("{}", resolved.display());
    Ok(())
}

pub async fn route_execute(args: RouteArgs) -> Result<()> {
    let navigator = Navigator::new(Arc::new(application_table()?));
    let navigation = navigator.navigate(&args.path).await?;
    print_json(&navigation)
}
