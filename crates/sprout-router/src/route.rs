//! Route records and the lazy view capability.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// A loaded view module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Component {
    /// Module specifier the view was loaded from
    pub module: String,
}

impl Component {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.module)
    }
}

pub type LoadError = Box<dyn StdError + Send + Sync>;

/// Pending view load.
pub type LoadFuture = BoxFuture<'static, Result<Component, LoadError>>;

/// Zero-argument asynchronous capability producing a route's view.
///
/// Every call starts a fresh load; nothing is cached here.
#[derive(Clone)]
pub struct ComponentLoader {
    load: Arc<dyn Fn() -> LoadFuture + Send + Sync>,
}

impl ComponentLoader {
    pub fn new<F, Fut>(load: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Component, LoadError>> + Send + 'static,
    {
        Self {
            load: Arc::new(move || load().boxed()),
        }
    }

    /// A loader that imports `specifier` as a separate chunk.
    pub fn import(specifier: impl Into<String>) -> Self {
        let specifier: Arc<str> = Arc::from(specifier.into());
        Self::new(move || {
            let specifier = Arc::clone(&specifier);
            async move { Ok::<_, LoadError>(Component::new(specifier.as_ref())) }
        })
    }

    pub fn load(&self) -> LoadFuture {
        (self.load)()
    }
}

impl fmt::Debug for ComponentLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ComponentLoader(..)")
    }
}

/// What a matched route does.
#[derive(Debug, Clone)]
pub enum RouteTarget {
    /// Re-resolve at another path
    Redirect(String),
    /// Load the view on demand
    Lazy(ComponentLoader),
}

/// One node of the route tree.
#[derive(Debug, Clone)]
pub struct Route {
    pub path: String,
    pub name: String,
    pub target: RouteTarget,
    /// Eagerly bound view rendered around the children
    pub layout: Option<Component>,
    pub children: Vec<Route>,
}

impl Route {
    pub fn lazy(path: impl Into<String>, name: impl Into<String>, loader: ComponentLoader) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            target: RouteTarget::Lazy(loader),
            layout: None,
            children: Vec::new(),
        }
    }

    pub fn redirect(
        path: impl Into<String>,
        name: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            target: RouteTarget::Redirect(to.into()),
            layout: None,
            children: Vec::new(),
        }
    }

    pub fn layout(mut self, layout: Component) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn children(mut self, children: Vec<Route>) -> Self {
        self.children = children;
        self
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match &self.target {
            RouteTarget::Redirect(to) => Some(to),
            RouteTarget::Lazy(_) => None,
        }
    }
}

/// Normalise a route path: leading slash, no trailing slash except for `/`.
pub(crate) fn normalize(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Full path of a child: absolute paths stand alone, relative ones hang off
/// the parent.
pub(crate) fn join(parent: &str, child: &str) -> String {
    if child.starts_with('/') || parent == "/" {
        normalize(child)
    } else {
        normalize(&format!("{parent}/{child}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_paths() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("hello/"), "/hello");
        assert_eq!(normalize("/a/b//"), "/a/b");
    }

    #[test]
    fn joins_child_paths() {
        assert_eq!(join("/", "hello"), "/hello");
        assert_eq!(join("/admin", "users"), "/admin/users");
        assert_eq!(join("/admin", "/hello"), "/hello");
    }

    #[test]
    fn import_loader_yields_its_module() {
        let loader = ComponentLoader::import("@views/hello/index");
        let component = futures::executor::block_on(loader.load()).unwrap();
        assert_eq!(component, Component::new("@views/hello/index"));
    }
}
