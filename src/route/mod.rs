//! # Route Module
//!
//! Route descriptors and the URL helpers derived from them.
//!
//! Every route registered on an [`App`](crate::App) is described by a
//! [`RouteInfo`]: its method, primary path pattern, handler name, path helper
//! name and aliases. The path helper ([`PathHelper`]) rebuilds concrete URLs
//! from a parameter bag:
//!
//! ```rust
//! use routekit::{App, AppConfig, Params};
//!
//! let mut app = App::new(AppConfig::default());
//! app.get("/widgets/{id}", |ctx| ctx.render_text(http::StatusCode::OK, "ok"))?;
//!
//! let url = app.path_for("widgetPath", &Params::new().with("id", 5).with("page", 2))?;
//! assert_eq!(url, "/widgets/5?page=2");
//! # Ok::<(), routekit::RouteError>(())
//! ```

mod core;
mod helper;
pub mod naming;
mod registry;

pub use core::RouteInfo;
pub use helper::{append_query, PathHelper, SafeUrl};
pub use registry::RouteMut;
