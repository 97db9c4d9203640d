//! # sprout-config
//!
//! Authored tables for the application build: path aliases, the icon-sprite
//! loader partition, shared-chunk cache groups, the compaction policy, style
//! injection and the environment signal that selects the build [`Mode`].
//!
//! Everything here is read-only once loaded. Policy decisions that depend on
//! the mode live in `sprout-bundler`.

pub mod alias;
pub mod cache_group;
pub mod config;
pub mod context;
pub mod discovery;
pub mod env;
pub mod error;
pub mod loader;
pub mod minify;
pub mod mode;
pub mod rules;
pub mod settings;
pub mod style;
pub mod validation;

pub use alias::{AliasEntry, AliasTable};
pub use cache_group::{CacheGroup, ChunkScope, application_cache_groups};
pub use config::SproutConfig;
pub use context::ContextReplacement;
pub use discovery::{ConfigDiscovery, discover};
pub use env::BuildEnvironment;
pub use error::{ConfigError, Result};
pub use loader::{
    AssetLoaderPartition, AssetPipeline, LoaderRule, LoaderSpec, ScriptRule, check_partition,
};
pub use minify::{EsTarget, MinifyPolicy};
pub use mode::Mode;
pub use rules::{RuleSet, RuleSpec, application_rules};
pub use settings::GlobalSettings;
pub use style::{CssOptions, Preprocessor, StyleInjection};
pub use validation::{ConfigValidator, FsValidator, SchemaValidator, missing_alias_targets};
