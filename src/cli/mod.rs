//! # CLI Module
//!
//! Command-line access to route manifests (see
//! [`RouteManifest`](crate::config::RouteManifest)).
//!
//! ## Commands
//!
//! ### `routes`
//!
//! Print the route table a manifest declares:
//!
//! ```bash
//! routekit routes --manifest routes.toml
//! routekit routes --manifest routes.toml --json
//! ```
//!
//! ### `path`
//!
//! Build a URL with a named path helper; parameters that are not placeholders of
//! the route end up in the query string:
//!
//! ```bash
//! $ routekit path --manifest routes.toml widgetPath id=5 page=2
//! /widgets/5?page=2
//! ```
//!
//! The manifest may also be given through `ROUTEKIT_MANIFEST`.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, Cli, Commands};
