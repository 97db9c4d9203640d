//! `sprout check`

use std::path::Path;

use sprout_config::{ConfigValidator, FsValidator, SchemaValidator, missing_alias_targets};
use sprout_router::application_table;

use super::load_project;
use crate::cli::CheckArgs;
use crate::error::Result;
use crate::ui;

/// Validate the project rules and the route table.
///
/// Stops at the first defect.
pub fn execute(root: &Path, args: CheckArgs) -> Result<()> {
    let project = load_project(root)?;

    let rules = if args.schema_only {
        ui::info("skipping filesystem checks");
        SchemaValidator::new(root).validate(&project)?
    } else {
        let rules = FsValidator::new(root).validate(&project)?;
        for entry in missing_alias_targets(&rules) {
            ui::warning(&format!(
                "alias {} points at missing directory {}",
                entry.prefix,
                entry.target.display()
            ));
        }
        rules
    };
    ui::success(&format!(
        "rules valid: {} aliases, {} loaders, {} cache groups",
        rules.aliases.len(),
        rules.loaders.len(),
        rules.cache_groups.len()
    ));

    let table = application_table()?;
    table.check()?;
    ui::success(&format!("route table valid: {} routes", table.len()));
    Ok(())
}
