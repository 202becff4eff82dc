//! # Configuration Module
//!
//! Application settings ([`AppConfig`]) loaded from environment variables or a
//! TOML/YAML/JSON file, and route manifests ([`RouteManifest`]) describing a
//! route table declaratively.

mod manifest;
mod settings;

pub use manifest::{RouteEntry, RouteManifest};
pub use settings::{AppConfig, Environment};
