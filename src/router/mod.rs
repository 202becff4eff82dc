//! # Router Module
//!
//! The router is the matcher behind route registration. It compiles path patterns,
//! matches incoming request paths to registered targets, and renders concrete paths
//! back out of a pattern for URL reconstruction.
//!
//! ## Pattern Syntax
//!
//! | Syntax | Matches | Example |
//! |--------|---------|---------|
//! | `{name}` | one path segment | `/widgets/{id}` |
//! | `{name:regex}` | text matching `regex` | `/widgets/{id:[0-9]+}` |
//! | `:name` | one whole path segment | `/widgets/:id` |
//!
//! ## Example
//!
//! ```rust
//! use routekit::router::{Lookup, RouteId, Router};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.register(Method::GET, "/widgets/{id}", RouteId::new(0)).unwrap();
//!
//! match router.route(&Method::GET, "/widgets/42") {
//!     Lookup::Matched { target, params } => {
//!         assert_eq!(target, RouteId::new(0));
//!         assert_eq!(params[0].1, "42");
//!     }
//!     _ => unreachable!(),
//! }
//! ```
//!
//! ## Performance
//!
//! Matching is a linear scan over compiled regexes in registration order; the first
//! entry whose pattern and method both match wins. Route tables for a single
//! application are small enough that this stays well under a microsecond per lookup.

mod core;
mod pattern;
#[cfg(test)]
mod tests;

pub use core::{Lookup, ParamVec, RouteId, Router, MAX_INLINE_PARAMS};
pub(crate) use pattern::segment_params;
pub use pattern::{PathPattern, RenderedPath};
