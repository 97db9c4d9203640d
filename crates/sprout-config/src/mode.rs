use std::fmt;

use serde::{Deserialize, Serialize};

/// Build environment selector.
///
/// Computed once per build invocation from the environment signal and never
/// mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Test,
    Production,
}

impl Mode {
    /// Derive the mode from the raw environment value.
    ///
    /// `production` and `prod` select production, `test` selects test.
    /// Anything else, including an absent value, falls back to development so
    /// that production stripping is never applied to an unexpected mode.
    pub fn from_signal(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Mode::Development;
        };

        match raw.trim() {
            "production" | "prod" => Mode::Production,
            "test" => Mode::Test,
            "development" | "dev" | "" => Mode::Development,
            other => {
                tracing::warn!(mode = other, "unrecognised build mode, using development");
                Mode::Development
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Test => "test",
            Mode::Production => "production",
        }
    }

    pub fn is_production(self) -> bool {
        self == Mode::Production
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
