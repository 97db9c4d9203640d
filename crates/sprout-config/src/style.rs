//! Shared stylesheet variables injected into every compiled stylesheet.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::mode::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preprocessor {
    #[default]
    Less,
    Sass,
    Scss,
    Stylus,
}

/// Ordered list of variable files prepended to each stylesheet.
///
/// Later files win when two define the same variable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyleInjection {
    #[serde(default)]
    pub preprocessor: Preprocessor,
    #[serde(default)]
    pub patterns: Vec<PathBuf>,
}

impl StyleInjection {
    pub fn application(root: impl AsRef<Path>) -> Self {
        Self {
            preprocessor: Preprocessor::Less,
            patterns: vec![root.as_ref().join("src/assets/styles/variables.less")],
        }
    }

    /// Import preamble for one stylesheet, in declaration order.
    pub fn preamble(&self) -> String {
        self.patterns
            .iter()
            .map(|path| format!("@import \"{}\";\n", path.display()))
            .collect()
    }
}

/// Stylesheet pipeline options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssOptions {
    pub modules: bool,
    /// Extract styles into separate files
    pub extract: bool,
    pub source_map: bool,
}

impl CssOptions {
    pub fn for_mode(mode: Mode) -> Self {
        Self {
            modules: false,
            extract: mode.is_production(),
            source_map: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preamble_preserves_order() {
        let injection = StyleInjection {
            preprocessor: Preprocessor::Less,
            patterns: vec![PathBuf::from("base.less"), PathBuf::from("theme.less")],
        };
        assert_eq!(
            injection.preamble(),
            "@import \"base.less\";\n@import \"theme.less\";\n"
        );
    }

    #[test]
    fn extraction_only_in_production() {
        assert!(CssOptions::for_mode(Mode::Production).extract);
        assert!(!CssOptions::for_mode(Mode::Development).extract);
        assert!(!CssOptions::for_mode(Mode::Test).extract);
    }
}
