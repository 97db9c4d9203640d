//! Route table errors.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RouteError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("no route matches '{path}'")]
    NoMatch { path: String },

    #[error("redirect cycle: {}", chain.join(" -> "))]
    RedirectCycle { chain: Vec<String> },

    #[error("route name '{name}' is used more than once")]
    DuplicateName { name: String },

    #[error("route '{from}' redirects to '{to}', which does not exist")]
    DanglingRedirect { from: String, to: String },

    #[error("the root route must declare a default redirect")]
    MissingRootRedirect,

    #[error("failed to load view for route '{route}': {reason}")]
    LoadFailed { route: String, reason: String },
}

impl RouteError {
    /// The table itself is inconsistent.
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            RouteError::RedirectCycle { .. }
                | RouteError::DuplicateName { .. }
                | RouteError::DanglingRedirect { .. }
                | RouteError::MissingRootRedirect
        )
    }
}
