use serde::{Deserialize, Serialize};

use crate::mode::Mode;

/// Output language level pinned for the compacted bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EsTarget {
    /// ECMAScript 5 (default; the shipped bundle targets legacy webviews)
    #[default]
    ES5,
    /// ECMAScript 2015 (ES6)
    ES2015,
    /// ECMAScript 2017
    ES2017,
    /// ECMAScript 2020
    ES2020,
    /// Latest ECMAScript
    ESNext,
}

impl EsTarget {
    /// Edition number as the minifier expects it (`5`, `2015`, ...).
    pub fn edition(self) -> u16 {
        match self {
            EsTarget::ES5 => 5,
            EsTarget::ES2015 => 2015,
            EsTarget::ES2017 => 2017,
            EsTarget::ES2020 => 2020,
            EsTarget::ESNext => 9999,
        }
    }
}

/// Code-compaction settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinifyPolicy {
    pub enabled: bool,

    /// Spread compaction over all available workers
    pub parallel: bool,

    /// Remove `console.*(...)` calls wherever they appear
    pub strip_console: bool,

    /// Remove `debugger` statements
    pub strip_debugger: bool,

    pub ecma: EsTarget,

    /// Calls treated as side-effect free
    pub pure_funcs: Vec<String>,

    pub source_map: bool,

    pub warnings: bool,
}

impl MinifyPolicy {
    /// The policy for `mode`; only production compacts.
    pub fn for_mode(mode: Mode) -> Option<Self> {
        mode.is_production().then(|| Self {
            enabled: true,
            parallel: true,
            strip_console: true,
            strip_debugger: true,
            ecma: EsTarget::ES5,
            pure_funcs: vec!["console.log".to_string()],
            source_map: false,
            warnings: false,
        })
    }
}
