//! Restricts dynamic-context requests to a subset of their directory.
//!
//! The date library pulls in every locale through a `require` context; only
//! the one the application ships is kept.

use regex::Regex;

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone)]
pub struct ContextReplacement {
    resource: Regex,
    keep: Regex,
}

impl ContextReplacement {
    pub fn new(resource: &str, keep: &str) -> Result<Self> {
        Ok(Self {
            resource: Regex::new(resource).map_err(|e| ConfigError::invalid_pattern(resource, e))?,
            keep: Regex::new(keep).map_err(|e| ConfigError::invalid_pattern(keep, e))?,
        })
    }

    /// `moment/locale` contexts keep only `zh-cn`.
    pub fn locales() -> Result<Self> {
        Self::new(r"moment[/\\]locale$", r"zh-cn$")
    }

    pub fn resource_pattern(&self) -> &str {
        self.resource.as_str()
    }

    pub fn keep_pattern(&self) -> &str {
        self.keep.as_str()
    }

    /// Candidates of `context_dir` that survive. Unrelated contexts pass
    /// through untouched.
    pub fn filter<'a>(&self, context_dir: &str, candidates: &[&'a str]) -> Vec<&'a str> {
        if !self.resource.is_match(context_dir) {
            return candidates.to_vec();
        }
        candidates
            .iter()
            .copied()
            .filter(|candidate| {
                let stem = candidate.strip_suffix(".js").unwrap_or(candidate);
                self.keep.is_match(stem)
            })
            .collect()
    }
}
