//! Route table: validated at startup, resolved on every navigation.

use rustc_hash::FxHashSet;

use crate::error::{Result, RouteError};
use crate::route::{Component, ComponentLoader, Route, RouteTarget, join, normalize};

#[derive(Debug, Clone)]
enum FlatTarget {
    /// Full target path
    Redirect(String),
    Lazy(ComponentLoader),
}

/// A route flattened in depth-first pre-order.
#[derive(Debug, Clone)]
struct FlatRoute {
    path: String,
    name: String,
    target: FlatTarget,
    /// Layouts of every ancestor, outermost first
    layouts: Vec<Component>,
}

/// The outcome of resolving a path.
#[derive(Debug, Clone)]
pub struct ResolvedRoute<'t> {
    /// Path of the component route finally matched
    pub path: &'t str,
    pub name: &'t str,
    pub loader: &'t ComponentLoader,
    pub layouts: &'t [Component],
    /// Every path visited, the request first
    pub chain: Vec<String>,
}

impl ResolvedRoute<'_> {
    pub fn redirected(&self) -> bool {
        self.chain.len() > 1
    }
}

#[derive(Debug, Clone)]
pub struct LazyRouteTable {
    routes: Vec<Route>,
    flat: Vec<FlatRoute>,
}

impl LazyRouteTable {
    /// Validate and index `routes`.
    ///
    /// Route names must be unique across the tree, every redirect must point
    /// at an existing path, and the root must redirect. Redirect cycles are
    /// only caught when resolved; see [`check`](Self::check).
    pub fn new(routes: Vec<Route>) -> Result<Self> {
        let mut flat = Vec::new();
        flatten(&routes, "/", &[], &mut flat);

        let mut names = FxHashSet::default();
        for route in &flat {
            if !names.insert(route.name.as_str()) {
                return Err(RouteError::DuplicateName {
                    name: route.name.clone(),
                });
            }
        }

        let paths: FxHashSet<&str> = flat.iter().map(|r| r.path.as_str()).collect();
        for route in &flat {
            let FlatTarget::Redirect(to) = &route.target else {
                continue;
            };
            if !paths.contains(to.as_str()) {
                return Err(RouteError::DanglingRedirect {
                    from: route.path.clone(),
                    to: to.clone(),
                });
            }
        }

        let root_redirects = flat
            .iter()
            .find(|r| r.path == "/")
            .is_some_and(|r| matches!(r.target, FlatTarget::Redirect(_)));
        if !root_redirects {
            return Err(RouteError::MissingRootRedirect);
        }

        tracing::debug!(routes = flat.len(), "route table ready");
        Ok(Self { routes, flat })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Full paths in depth-first order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.flat.iter().map(|r| r.path.as_str())
    }

    pub fn len(&self) -> usize {
        self.flat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    /// Resolve `path` to the loader of a component route, following
    /// redirects.
    ///
    /// # Example
    ///
    /// ```
    /// use sprout_router::{ComponentLoader, LazyRouteTable, Route};
    ///
    /// let table = LazyRouteTable::new(vec![
    ///     Route::redirect("/", "index", "/hello").children(vec![
    ///         Route::lazy("/hello", "hello", ComponentLoader::import("@views/hello/index")),
    ///     ]),
    /// ])
    /// .unwrap();
    ///
    /// let resolved = table.resolve("/").unwrap();
    /// assert_eq!(resolved.name, "hello");
    /// assert_eq!(resolved.chain, ["/", "/hello"]);
    /// ```
    pub fn resolve(&self, path: &str) -> Result<ResolvedRoute<'_>> {
        let mut visited = FxHashSet::default();
        let mut chain = Vec::new();
        let mut current = normalize(path);

        loop {
            if !visited.insert(current.clone()) {
                chain.push(current);
                return Err(RouteError::RedirectCycle { chain });
            }
            chain.push(current.clone());

            let route = self
                .flat
                .iter()
                .find(|r| r.path == current)
                .ok_or_else(|| RouteError::NoMatch {
                    path: current.clone(),
                })?;

            match &route.target {
                FlatTarget::Redirect(to) => {
                    tracing::debug!(from = %route.path, to = %to, "following redirect");
                    current = to.clone();
                }
                FlatTarget::Lazy(loader) => {
                    return Ok(ResolvedRoute {
                        path: &route.path,
                        name: &route.name,
                        loader,
                        layouts: &route.layouts,
                        chain,
                    });
                }
            }
        }
    }

    /// Resolve every path in the table, surfacing redirect cycles.
    pub fn check(&self) -> Result<()> {
        for path in self.paths() {
            self.resolve(path)?;
        }
        Ok(())
    }
}

fn flatten(routes: &[Route], parent: &str, layouts: &[Component], out: &mut Vec<FlatRoute>) {
    for route in routes {
        let path = join(parent, &route.path);
        let target = match &route.target {
            RouteTarget::Redirect(to) => FlatTarget::Redirect(join(parent, to)),
            RouteTarget::Lazy(loader) => FlatTarget::Lazy(loader.clone()),
        };
        out.push(FlatRoute {
            path: path.clone(),
            name: route.name.clone(),
            target,
            layouts: layouts.to_vec(),
        });

        let mut inner = layouts.to_vec();
        inner.extend(route.layout.clone());
        flatten(&route.children, &path, &inner, out);
    }
}
