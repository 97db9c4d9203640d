#![cfg_attr(docsrs, feature(doc_cfg))]

//! # sprout-bundler
//!
//! The build-configuration pass: turns the project tables from
//! `sprout-config` and the environment signal into one [`BuildConfig`] for
//! the external bundler, then groups its module graph into shared chunks and
//! strips debugging statements from the emitted code.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sprout_bundler::{ChunkGroupingPolicy, ModuleGraph, configure};
//! use sprout_config::{BuildEnvironment, discover};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let project = discover()?;
//! let env = BuildEnvironment::from_env()?;
//! let config = configure(".", &project, &env)?;
//!
//! if let Some(groups) = config.optimization.split_chunks.clone() {
//!     let policy = ChunkGroupingPolicy::from_preference(groups)?;
//!     let graph = ModuleGraph::from_json(&std::fs::read_to_string("graph.json")?)?;
//!     let layout = policy.split(&graph)?;
//!     println!("{} shared chunks", layout.shared.len());
//! }
//! # Ok(()) }
//! ```
//!
//! ## Logging
//!
//! The crate only emits `tracing` events. Enable the `logging` feature for
//! [`logging::init_logging`].

pub mod chunks;
pub mod config;
pub mod error;
pub mod minify;
pub mod pipeline;
pub mod policy;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

pub use chunks::{ChunkGroupingPolicy, ChunkKind, ChunkLayout, ModuleGraph, ModuleRecord, SharedChunk};
pub use config::{BuildConfig, ModuleRule, OutputConfig};
pub use error::{BuildError, Result};
pub use minify::{CompactedModule, MinificationPipeline, SourceModule, StripStats};
pub use pipeline::{BuildPipeline, BuildStage, StagePhase, configure};
pub use policy::{AnalyzerMode, BuildSettings, EnvironmentBuildPolicy, PluginSpec, SourceMapKind};
