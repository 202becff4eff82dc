use crate::app::App;
use crate::context::Context;
use crate::dispatcher::{Handler, HandlerResult};
use crate::error::HttpError;
use anyhow::Context as _;
use http::Method;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::settings::{load_document, AppConfig};

/// One route as declared in a manifest file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub method: String,
    pub path: String,
    pub handler: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

/// A route table declared in TOML, YAML or JSON.
///
/// ```toml
/// [[routes]]
/// method = "GET"
/// path = "/widgets/{id}"
/// handler = "widgets::show"
/// aliases = ["/gadgets/{id}"]
/// name = "widget"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteManifest {
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

/// Stands in for a manifest route's handler until a real one is registered
struct PendingHandler {
    name: String,
}

impl Handler for PendingHandler {
    fn call(&self, _ctx: &mut Context<'_>) -> HandlerResult {
        Err(HttpError::not_implemented(format!("handler {} is not implemented", self.name)).into())
    }
}

impl RouteManifest {
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        load_document(path.as_ref())
    }

    /// Build an application serving every declared route with a `501 Not Implemented` stub.
    ///
    /// # Errors
    ///
    /// Fails on an invalid method, pattern or name, naming the offending entry.
    pub fn build_app(&self, config: AppConfig) -> anyhow::Result<App> {
        let mut app = App::new(config);
        for (index, entry) in self.routes.iter().enumerate() {
            let method = Method::from_bytes(entry.method.trim().to_ascii_uppercase().as_bytes())
                .with_context(|| format!("route #{index}: invalid method {:?}", entry.method))?;
            let handler = Arc::new(PendingHandler {
                name: entry.handler.clone(),
            });
            let route = app
                .add_route_with_name(method, &entry.path, &entry.handler, handler)
                .with_context(|| format!("route #{index}: {} {}", entry.method, entry.path))?
                .alias(&entry.aliases)
                .with_context(|| format!("route #{index}: invalid alias"))?;
            if let Some(name) = &entry.name {
                route
                    .name(name)
                    .with_context(|| format!("route #{index}: cannot name route {name:?}"))?;
            }
        }
        info!(route_count = app.routes().len(), "Application built from manifest");
        Ok(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_manifest() {
        let manifest: RouteManifest = serde_yaml::from_str(
            "routes:\n  - method: get\n    path: /widgets\n    handler: widgets::index\n",
        )
        .unwrap();
        let app = manifest.build_app(AppConfig::default()).unwrap();
        assert_eq!(*app.routes()[0].method(), Method::GET);
        assert_eq!(app.routes()[0].path_name(), "widgetsPath");
    }

    #[test]
    fn test_invalid_method_is_reported() {
        let manifest = RouteManifest {
            routes: vec![RouteEntry {
                method: "NOT A METHOD".to_string(),
                path: "/".to_string(),
                handler: "x".to_string(),
                name: None,
                aliases: Vec::new(),
            }],
        };
        let err = manifest.build_app(AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("route #0"));
    }
}
