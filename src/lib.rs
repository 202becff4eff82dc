//! # routekit
//!
//! **routekit** is the routing core of a request-per-handler web framework: route
//! descriptors with aliases and named URL helpers, a matcher, and a dispatcher
//! that turns handler failures into responses through a status-keyed table of
//! error handlers.
//!
//! ## Architecture
//!
//! - **[`router`]** - Path pattern compilation, matching and rendering
//! - **[`route`]** - Route descriptors, naming and aliasing, path helpers
//! - **[`dispatcher`]** - Handler execution and error handling
//! - **[`context`]** - Per-request context, session and flash messages
//! - **[`middleware`]** - Handler middleware (tracing, metrics, closures)
//! - **[`server`]** - Response sink and installable request targets
//! - **[`config`]** - Application settings and route manifests
//! - **[`logging`]** - `tracing` subscriber setup
//!
//! ## Quick Start
//!
//! ```rust
//! use http::StatusCode;
//! use routekit::{App, AppConfig, HttpError, Params};
//!
//! let mut app = App::new(AppConfig::default());
//! app.get("/widgets/{id}", |ctx| {
//!     let id = ctx.param("id").unwrap_or_default().to_string();
//!     if id == "0" {
//!         return Err(HttpError::not_found("no such widget").into());
//!     }
//!     ctx.render_text(StatusCode::OK, format!("widget {id}"))
//! })?
//! .alias(["/gadgets/{id}"])?
//! .name("widget")?;
//!
//! // URL reconstruction: unused parameters become a sorted query string
//! let url = app.path_for("widgetPath", &Params::new().with("id", 5).with("page", 2))?;
//! assert_eq!(url, "/widgets/5?page=2");
//!
//! // In-process serving
//! let res = app.handle(http::Request::get("/gadgets/0").body(Vec::new()).unwrap());
//! assert_eq!(res.status(), StatusCode::NOT_FOUND);
//! # Ok::<(), routekit::RouteError>(())
//! ```
//!
//! ## Error Handling
//!
//! Handlers return `anyhow::Result<()>`. An [`HttpError`] at the root of the error
//! chain selects the error handler for its status; any other error is a `500`.
//! If the selected error handler fails as well, the request is still answered
//! with a bare `500`.

pub mod app;
pub mod cli;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod params;
pub mod route;
pub mod router;
pub mod server;

pub use app::{App, RouteTarget};
pub use config::{AppConfig, Environment, RouteManifest};
pub use context::Context;
pub use dispatcher::{ErrorHandler, ErrorHandlers, Handler, HandlerResult};
pub use error::{status_of, HttpError, RouteError};
pub use ids::RequestId;
pub use params::{ParamValue, Params};
pub use route::{PathHelper, RouteInfo, RouteMut, SafeUrl};
pub use router::RouteId;
pub use server::{RecordedResponse, Request, ResponseWriter, Service};
