//! The application's route tree.

use crate::error::Result;
use crate::route::{Component, ComponentLoader, Route};
use crate::table::LazyRouteTable;

/// Layout wrapping every top-level page.
pub const BASIC_LAYOUT: &str = "@layouts/BasicLayout";

/// Landing page the root redirects to.
pub const HOME_PATH: &str = "/hello";

/// Top-level features are appended as children of the root, each with its
/// own loader so that it ships as a separate chunk.
pub fn application_routes() -> Vec<Route> {
    vec![
        Route::redirect("/", "index", HOME_PATH)
            .layout(Component::new(BASIC_LAYOUT))
            .children(vec![Route::lazy(
                HOME_PATH,
                "hello",
                ComponentLoader::import("@views/hello/index"),
            )]),
    ]
}

pub fn application_table() -> Result<LazyRouteTable> {
    LazyRouteTable::new(application_routes())
}
