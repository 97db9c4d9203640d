//! Navigation: resolve, then load the view.
//!
//! Each call to [`Navigator::navigate`] starts its own load. Concurrent
//! navigations to one route are not merged, and a superseded navigation is
//! not cancelled; the caller drops the result.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{Result, RouteError};
use crate::route::Component;
use crate::table::LazyRouteTable;

/// A settled navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub requested: String,
    /// Path of the route that rendered
    pub resolved: String,
    pub route: String,
    pub component: Component,
    pub layouts: Vec<Component>,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    table: Arc<LazyRouteTable>,
}

impl Navigator {
    pub fn new(table: Arc<LazyRouteTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &LazyRouteTable {
        &self.table
    }

    /// Resolve `path` and wait for its view to load.
    pub async fn navigate(&self, path: &str) -> Result<Navigation> {
        let resolved = self.table.resolve(path)?;
        let pending = resolved.loader.load();
        let route = resolved.name.to_string();
        let target = resolved.path.to_string();
        let layouts = resolved.layouts.to_vec();
        tracing::debug!(requested = path, resolved = %target, route = %route, "loading view");

        let component = pending.await.map_err(|e| RouteError::LoadFailed {
            route: route.clone(),
            reason: e.to_string(),
        })?;

        tracing::info!(route = %route, component = %component, "navigation settled");
        Ok(Navigation {
            requested: path.to_string(),
            resolved: target,
            route,
            component,
            layouts,
        })
    }
}
