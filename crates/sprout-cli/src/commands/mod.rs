//! Command implementations.

mod check;
mod chunks;
mod inspect;
mod lookup;

use std::path::Path;

use serde::Serialize;
use sprout_config::{BuildEnvironment, ConfigDiscovery, SproutConfig};

use crate::cli::ModeArg;
use crate::error::Result;

pub use check::execute as check_execute;
pub use chunks::execute as chunks_execute;
pub use inspect::execute as inspect_execute;
pub use lookup::{resolve_execute, route_execute};

/// The environment signal, with `--mode` taking precedence over `NODE_ENV`.
pub(crate) fn environment(mode: Option<ModeArg>) -> Result<BuildEnvironment> {
    let env = BuildEnvironment::from_env()?;
    Ok(match mode {
        Some(mode) => BuildEnvironment {
            mode: mode.into(),
            ..env
        },
        None => env,
    })
}

pub(crate) fn load_project(root: &Path) -> Result<SproutConfig> {
    Ok(ConfigDiscovery::new(root).load_or_default()?)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
