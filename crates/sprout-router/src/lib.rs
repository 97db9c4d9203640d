//! # sprout-router
//!
//! The application's route tree. Leaf routes carry a [`ComponentLoader`]
//! instead of a view, so every page ships as its own chunk and is fetched on
//! first navigation.
//!
//! ```
//! use std::sync::Arc;
//! use sprout_router::{Navigator, application_table};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> sprout_router::Result<()> {
//! let navigator = Navigator::new(Arc::new(application_table()?));
//! let navigation = navigator.navigate("/").await?;
//! assert_eq!(navigation.route, "hello");
//! # Ok(()) }
//! ```

pub mod app;
pub mod error;
pub mod navigate;
pub mod route;
pub mod table;

pub use app::{application_routes, application_table};
pub use error::{Result, RouteError};
pub use navigate::{Navigation, Navigator};
pub use route::{Component, ComponentLoader, LoadError, LoadFuture, Route, RouteTarget};
pub use table::{LazyRouteTable, ResolvedRoute};
