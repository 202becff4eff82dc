//! # Middleware Module
//!
//! Middleware wraps route handlers in onion order: the first layer pushed runs
//! first and sees the result of everything inside it.
//!
//! ```rust
//! use routekit::middleware::{from_fn, TracingMiddleware};
//! use routekit::{App, AppConfig};
//!
//! let mut app = App::new(AppConfig::default());
//! app.use_middleware(TracingMiddleware);
//! app.use_middleware(from_fn(|ctx, next| {
//!     ctx.response()
//!         .headers_mut()
//!         .insert("x-powered-by", http::HeaderValue::from_static("routekit"));
//!     next.run(ctx)
//! }));
//! ```
//!
//! A layer can be switched off for specific handlers with
//! [`MiddlewareStack::skip`], keyed by the middleware's type name (see [`key_of`]).

mod core;
mod metrics;
mod tracing;

pub use core::{from_fn, key_of, FnMiddleware, Middleware, MiddlewareStack, Next, Wrapped};
pub use metrics::MetricsMiddleware;
pub use tracing::TracingMiddleware;
