//! Subscriber setup for the CLI.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const QUIET_FILTER: &str = "error";
const SPROUT_CRATES: [&str; 4] = ["sprout_cli", "sprout_bundler", "sprout_config", "sprout_router"];

fn crate_filter(level: &str) -> String {
    SPROUT_CRATES
        .iter()
        .map(|name| format!("{name}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Pick the filter for the global flags. `--verbose` and `--quiet` win, then
/// `RUST_LOG`, then the project's `settings.log_level`, then info.
pub fn filter_for(verbose: bool, quiet: bool, project_level: Option<&str>) -> EnvFilter {
    if verbose {
        EnvFilter::new(crate_filter("debug"))
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let level = project_level.unwrap_or("info");
            EnvFilter::try_new(crate_filter(level)).unwrap_or_else(|_| {
                EnvFilter::new(crate_filter("info"))
            })
        })
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays
/// machine readable.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool, project_level: Option<&str>) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && crate::ui::should_use_color())
        .without_time()
        .compact();

    tracing_subscriber::registry()
        .with(filter_for(verbose, quiet, project_level))
        .with(fmt_layer)
        .init();
}
