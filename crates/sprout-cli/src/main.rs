//! Sprout CLI entry point.

use clap::Parser;
use miette::Result;
use sprout_cli::{cli, commands, error, logger, ui};
use sprout_config::ConfigDiscovery;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Best effort: a broken config is reported by the command itself.
    let project_level = ConfigDiscovery::new(&args.root)
        .load_or_default()
        .ok()
        .and_then(|config| config.settings.log_level);
    logger::init_logger(
        args.verbose,
        args.quiet,
        args.no_color,
        project_level.as_deref(),
    );
    ui::init_colors(args.no_color);

    let root = args.root;
    let result = match args.command {
        cli::Command::Inspect(a) => commands::inspect_execute(&root, a),
        cli::Command::Check(a) => commands::check_execute(&root, a),
        cli::Command::Chunks(a) => commands::chunks_execute(&root, a),
        cli::Command::Resolve(a) => commands::resolve_execute(&root, a),
        cli::Command::Route(a) => commands::route_execute(a).await,
    };

    result.map_err(error::cli_error_to_miette)
}
