//! Environment signal: the one external variable that selects the mode plus
//! the independent feature flags read at configuration time.

use std::path::PathBuf;

use figment::Figment;
use figment::providers::Env;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::mode::Mode;

/// Environment variables consulted when building the configuration.
pub const SIGNAL_KEYS: [&str; 4] = ["NODE_ENV", "IS_ANALYZ", "HOT_RELOAD", "OUTPUT_DIR"];

/// Snapshot of the environment signal, taken once per build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildEnvironment {
    pub mode: Mode,

    /// Emit a static bundle-analysis report
    pub analyze: bool,

    /// Hot-module reload for the dev server
    pub hot_reload: bool,

    pub output_dir: PathBuf,
}

impl Default for BuildEnvironment {
    fn default() -> Self {
        Self {
            mode: Mode::Development,
            analyze: false,
            hot_reload: true,
            output_dir: PathBuf::from("dist"),
        }
    }
}

// Figment parses env values loosely ("1" becomes an integer), so every key is
// accepted in any scalar shape and normalised afterwards.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignalValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SignalValue {
    fn into_text(self) -> String {
        match self {
            SignalValue::Bool(b) => b.to_string(),
            SignalValue::Int(i) => i.to_string(),
            SignalValue::Float(f) => f.to_string(),
            SignalValue::Text(s) => s,
        }
    }

    /// Shell-style truthiness: set and not empty, `0` or `false`.
    ///
    /// Stricter than a JavaScript truthiness test on `process.env`, where any
    /// non-empty string is true: `IS_ANALYZ=0` or `IS_ANALYZ=false` turns the
    /// analyzer on there and off here.
    fn is_truthy(&self) -> bool {
        match self {
            SignalValue::Bool(b) => *b,
            SignalValue::Int(i) => *i != 0,
            SignalValue::Float(f) => *f != 0.0,
            SignalValue::Text(s) => {
                let s = s.trim();
                !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawSignal {
    #[serde(default)]
    node_env: Option<SignalValue>,
    #[serde(default)]
    is_analyz: Option<SignalValue>,
    #[serde(default)]
    hot_reload: Option<SignalValue>,
    #[serde(default)]
    output_dir: Option<SignalValue>,
}

impl BuildEnvironment {
    /// Read the signal from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_figment(Figment::from(Env::raw().only(&SIGNAL_KEYS)))
    }

    /// Read the signal from an arbitrary figment (lowercase keys).
    ///
    /// # Example
    ///
    /// ```
    /// use figment::Figment;
    /// use sprout_config::{BuildEnvironment, Mode};
    ///
    /// let figment = Figment::new()
    ///     .merge(("node_env", "prod"))
    ///     .merge(("is_analyz", "1"));
    /// let env = BuildEnvironment::from_figment(figment).unwrap();
    /// assert_eq!(env.mode, Mode::Production);
    /// assert!(env.analyze);
    /// ```
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let raw: RawSignal = figment.extract().map_err(|e| ConfigError::InvalidValue {
            field: "environment".to_string(),
            hint: Some(e.to_string()),
        })?;

        let defaults = Self::default();
        let node_env = raw.node_env.map(SignalValue::into_text);

        let env = Self {
            mode: Mode::from_signal(node_env.as_deref()),
            analyze: raw.is_analyz.is_some_and(|v| v.is_truthy()),
            hot_reload: raw
                .hot_reload
                .map_or(defaults.hot_reload, |v| v.is_truthy()),
            output_dir: raw
                .output_dir
                .map(SignalValue::into_text)
                .filter(|s| !s.trim().is_empty())
                .map_or(defaults.output_dir, PathBuf::from),
        };

        tracing::debug!(
            mode = %env.mode,
            analyze = env.analyze,
            hot_reload = env.hot_reload,
            "read build environment"
        );
        Ok(env)
    }

    /// Fixed environment for a given mode with every flag at its default.
    pub fn for_mode(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_analyze(mut self, analyze: bool) -> Self {
        self.analyze = analyze;
        self
    }

    pub fn with_hot_reload(mut self, hot_reload: bool) -> Self {
        self.hot_reload = hot_reload;
        self
    }
}
