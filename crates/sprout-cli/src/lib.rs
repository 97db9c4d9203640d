//! # sprout-cli
//!
//! Command-line front end for the build configuration:
//!
//! - [`cli`] - argument definitions
//! - [`commands`] - one function per subcommand
//! - [`error`] - CLI errors and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status lines on stderr
//!
//! Machine-readable output (JSON, resolved paths) goes to stdout; status and
//! logs go to stderr.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;
