use crate::app::App;
use crate::dispatcher::{self, Handler};
use crate::router::{ParamVec, PathPattern, RouteId};
use crate::server::{Request, ResponseWriter};
use http::Method;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

use super::helper::PathHelper;

fn serialize_method<S: Serializer>(method: &Method, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(method.as_str())
}

/// Descriptor of one registered route.
///
/// Serializes (and displays, pretty-printed) as
/// `{"method", "path", "handler", "pathName", "aliases"}`; the compiled pattern,
/// the handler itself and the owning application are not part of that form.
#[derive(Clone, Serialize)]
pub struct RouteInfo {
    #[serde(serialize_with = "serialize_method")]
    method: Method,
    path: String,
    #[serde(rename = "handler")]
    handler_name: String,
    #[serde(rename = "pathName")]
    path_name: String,
    aliases: Vec<String>,
    #[serde(skip)]
    id: RouteId,
    #[serde(skip)]
    pattern: Arc<PathPattern>,
    #[serde(skip)]
    alias_patterns: Vec<Arc<PathPattern>>,
    #[serde(skip)]
    handler: Arc<dyn Handler>,
}

impl RouteInfo {
    pub(crate) fn new(
        id: RouteId,
        method: Method,
        pattern: Arc<PathPattern>,
        handler_name: String,
        handler: Arc<dyn Handler>,
        path_name: String,
    ) -> Self {
        Self {
            method,
            path: pattern.as_str().to_string(),
            handler_name,
            path_name,
            aliases: Vec::new(),
            id,
            pattern,
            alias_patterns: Vec::new(),
            handler,
        }
    }

    #[must_use]
    pub fn id(&self) -> RouteId {
        self.id
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The primary path pattern
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Diagnostic name of the handler, used in logs and by middleware skipping
    #[must_use]
    pub fn handler_name(&self) -> &str {
        &self.handler_name
    }

    #[must_use]
    pub fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }

    /// Name the route's path helper is registered under
    #[must_use]
    pub fn path_name(&self) -> &str {
        &self.path_name
    }

    /// Extra patterns that dispatch to this route, in the order they were added
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Compiled primary pattern followed by each alias pattern
    pub fn patterns(&self) -> impl Iterator<Item = &PathPattern> {
        std::iter::once(&*self.pattern).chain(self.alias_patterns.iter().map(|p| &**p))
    }

    /// Placeholder values of `path` under the first of [`patterns`](Self::patterns)
    /// that matches it.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<ParamVec> {
        self.patterns().find_map(|p| p.captures(path))
    }

    /// A helper building URLs for this route's primary pattern
    #[must_use]
    pub fn build_path_helper(&self) -> PathHelper {
        PathHelper::new(&self.path_name, Arc::clone(&self.pattern))
    }

    /// Serve `req` with this route's handler on behalf of `app`.
    ///
    /// `params` are the placeholder values the matcher extracted from the path.
    /// Handler failures are answered through `app`'s error handlers; this never
    /// leaves the response unanswered.
    pub fn serve(&self, app: &App, req: Request, params: ParamVec, res: &mut dyn ResponseWriter) {
        dispatcher::serve(app, self, req, params, res);
    }

    pub(crate) fn replace_handler(&mut self, handler_name: String, handler: Arc<dyn Handler>) {
        self.handler_name = handler_name;
        self.handler = handler;
    }

    pub(crate) fn push_alias(&mut self, pattern: Arc<PathPattern>) {
        self.aliases.push(pattern.as_str().to_string());
        self.alias_patterns.push(pattern);
    }

    pub(crate) fn set_path_name(&mut self, name: String) -> String {
        std::mem::replace(&mut self.path_name, name)
    }
}

impl fmt::Debug for RouteInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteInfo")
            .field("id", &self.id)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("handler_name", &self.handler_name)
            .field("path_name", &self.path_name)
            .field("aliases", &self.aliases)
            .finish()
    }
}

impl fmt::Display for RouteInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
