//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use sprout_config::Mode;

/// Sprout - build configuration for the application
#[derive(Parser, Debug)]
#[command(
    name = "sprout",
    version,
    about = "Inspect and check the application build configuration"
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project root
    #[arg(long, global = true, default_value = ".", value_name = "DIR")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the derived build configuration as JSON
    Inspect(InspectArgs),

    /// Validate project rules, files on disk and the route table
    Check(CheckArgs),

    /// Apply the production chunk policy to a module graph
    ///
    /// The graph is a JSON file with `chunks` ({name, kind}) and `modules`
    /// ({path, chunks}).
    Chunks(ChunksArgs),

    /// Resolve an aliased module request
    Resolve(ResolveArgs),

    /// Resolve a route path and load its view
    Route(RouteArgs),
}

/// Mode override; without it `NODE_ENV` decides.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Development,
    Test,
    Production,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Development => Mode::Development,
            ModeArg::Test => Mode::Test,
            ModeArg::Production => Mode::Production,
        }
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Print only the mode-derived settings
    #[arg(long)]
    pub settings: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Skip filesystem checks (entry modules, stylesheets)
    #[arg(long)]
    pub schema_only: bool,
}

#[derive(Args, Debug)]
pub struct ChunksArgs {
    /// Graph file, relative to the working directory (not `--root`)
    #[arg(value_name = "GRAPH")]
    pub graph: PathBuf,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Request such as `@views/hello/index`
    pub request: String,
}

#[derive(Args, Debug)]
pub struct RouteArgs {
    pub path: String,
}
