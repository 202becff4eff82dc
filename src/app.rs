//! # App Module
//!
//! [`App`] owns everything needed to serve requests: the route registry, the
//! matcher, middleware, error handlers, the session store and configuration.

use crate::config::AppConfig;
use crate::context::{Context, MemorySessionStore, SessionStore};
use crate::dispatcher::{self, ErrorHandlers, Handler, HandlerResult};
use crate::error::{HttpError, RouteError};
use crate::middleware::{Middleware, MiddlewareStack};
use crate::params::{ParamValue, Params};
use crate::route::naming::{generate_name, PATH_SUFFIX};
use crate::route::{PathHelper, RouteInfo, RouteMut, SafeUrl};
use crate::router::{Lookup, ParamVec, RouteId, Router};
use crate::server::{RecordedResponse, Request, ResponseWriter, Service};
use http::header::ALLOW;
use http::{HeaderValue, Method};
use minijinja::value::{Kwargs, ValueKind};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{error, info, warn};

/// A web application: routes plus the machinery to serve them.
///
/// ```rust
/// use http::StatusCode;
/// use routekit::{App, AppConfig};
///
/// let mut app = App::new(AppConfig::default());
/// app.get("/hello/{name}", |ctx| {
///     let name = ctx.param("name").unwrap_or("world").to_string();
///     ctx.render_text(StatusCode::OK, format!("hello {name}"))
/// })?;
///
/// let req = http::Request::get("/hello/ferris").body(Vec::new()).unwrap();
/// let res = app.handle(req);
/// assert_eq!(res.body(), b"hello ferris");
/// # Ok::<(), routekit::RouteError>(())
/// ```
pub struct App {
    config: AppConfig,
    router: Router,
    routes: Vec<RouteInfo>,
    middleware: MiddlewareStack,
    error_handlers: ErrorHandlers,
    sessions: Arc<dyn SessionStore>,
}

impl App {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            router: Router::new(),
            routes: Vec::new(),
            middleware: MiddlewareStack::new(),
            error_handlers: ErrorHandlers::new(),
            sessions: Arc::new(MemorySessionStore::new()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPattern`] if `path` does not compile.
    pub fn get<F>(&mut self, path: &str, handler: F) -> Result<RouteMut<'_>, RouteError>
    where
        F: Fn(&mut Context<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.add_route(Method::GET, path, handler)
    }

    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPattern`] if `path` does not compile.
    pub fn post<F>(&mut self, path: &str, handler: F) -> Result<RouteMut<'_>, RouteError>
    where
        F: Fn(&mut Context<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.add_route(Method::POST, path, handler)
    }

    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPattern`] if `path` does not compile.
    pub fn put<F>(&mut self, path: &str, handler: F) -> Result<RouteMut<'_>, RouteError>
    where
        F: Fn(&mut Context<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.add_route(Method::PUT, path, handler)
    }

    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPattern`] if `path` does not compile.
    pub fn patch<F>(&mut self, path: &str, handler: F) -> Result<RouteMut<'_>, RouteError>
    where
        F: Fn(&mut Context<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.add_route(Method::PATCH, path, handler)
    }

    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPattern`] if `path` does not compile.
    pub fn delete<F>(&mut self, path: &str, handler: F) -> Result<RouteMut<'_>, RouteError>
    where
        F: Fn(&mut Context<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.add_route(Method::DELETE, path, handler)
    }

    /// Register `handler` for `method` and `path`, named after the handler's type.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPattern`] if `path` does not compile.
    pub fn add_route<H: Handler>(&mut self, method: Method, path: &str, handler: H) -> Result<RouteMut<'_>, RouteError> {
        let handler_name = std::any::type_name::<H>();
        self.add_route_with_name(method, path, handler_name, Arc::new(handler))
    }

    /// Register an already shared handler under an explicit diagnostic name.
    ///
    /// Registering a `(method, path)` pair again replaces the handler of the
    /// existing route, keeping its name and aliases.
    ///
    /// # Errors
    ///
    /// - [`RouteError::InvalidPattern`] if `path` does not compile
    /// - [`RouteError::PatternConflict`] if `(method, path)` is an alias of another route
    pub fn add_route_with_name(
        &mut self,
        method: Method,
        path: &str,
        handler_name: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<RouteMut<'_>, RouteError> {
        if let Some(existing) = self
            .routes
            .iter_mut()
            .find(|r| *r.method() == method && r.path() == path)
        {
            warn!(
                method = %method,
                route_path = %path,
                previous_handler = %existing.handler_name(),
                handler_name = %handler_name,
                "Replaced existing handler"
            );
            existing.replace_handler(handler_name.to_string(), handler);
            let id = existing.id();
            return Ok(RouteMut::new(self, id));
        }

        let id = RouteId::new(self.routes.len());
        let pattern = self.router.register(method.clone(), path, id)?;
        let path_name = self.unique_generated_name(path);
        info!(
            method = %method,
            route_path = %path,
            handler_name = %handler_name,
            path_name = %path_name,
            total_routes = self.routes.len() + 1,
            "Route registered"
        );
        self.routes.push(RouteInfo::new(
            id,
            method,
            pattern,
            handler_name.to_string(),
            handler,
            path_name,
        ));
        Ok(RouteMut::new(self, id))
    }

    fn name_taken(&self, name: &str, path: &str) -> bool {
        self.routes
            .iter()
            .any(|r| r.path_name() == name && r.path() != path)
    }

    fn unique_generated_name(&self, path: &str) -> String {
        let name = generate_name(path, false);
        if !self.name_taken(&name, path) {
            return name;
        }
        let detailed = generate_name(path, true);
        if !self.name_taken(&detailed, path) {
            return detailed;
        }
        let stem = detailed.trim_end_matches(PATH_SUFFIX);
        let mut n = 2;
        loop {
            let candidate = format!("{stem}{n}{PATH_SUFFIX}");
            if !self.name_taken(&candidate, path) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Mutable handle on an existing route
    pub fn route_mut(&mut self, id: RouteId) -> Option<RouteMut<'_>> {
        if id.index() < self.routes.len() {
            Some(RouteMut::new(self, id))
        } else {
            None
        }
    }

    /// All routes in registration order
    #[must_use]
    pub fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    #[must_use]
    pub fn route(&self, id: RouteId) -> Option<&RouteInfo> {
        self.routes.get(id.index())
    }

    /// The first route whose path helper is called `name`
    #[must_use]
    pub fn route_named(&self, name: &str) -> Option<&RouteInfo> {
        self.routes.iter().find(|r| r.path_name() == name)
    }

    pub(crate) fn route_ref(&self, id: RouteId) -> &RouteInfo {
        &self.routes[id.index()]
    }

    pub(crate) fn route_mut_ref(&mut self, id: RouteId) -> &mut RouteInfo {
        &mut self.routes[id.index()]
    }

    pub(crate) fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Wrap every route handler in `middleware`, after the layers added before it
    pub fn use_middleware<M: Middleware + 'static>(&mut self, middleware: M) {
        self.middleware.push(middleware);
    }

    #[must_use]
    pub fn middleware(&self) -> &MiddlewareStack {
        &self.middleware
    }

    pub fn middleware_mut(&mut self) -> &mut MiddlewareStack {
        &mut self.middleware
    }

    #[must_use]
    pub fn error_handlers(&self) -> &ErrorHandlers {
        &self.error_handlers
    }

    pub fn error_handlers_mut(&mut self) -> &mut ErrorHandlers {
        &mut self.error_handlers
    }

    #[must_use]
    pub fn sessions(&self) -> &dyn SessionStore {
        self.sessions.as_ref()
    }

    pub fn set_session_store(&mut self, store: Arc<dyn SessionStore>) {
        self.sessions = store;
    }

    /// Build the context a handler sees for `req`
    pub fn new_context<'a>(
        &'a self,
        route: Option<&'a RouteInfo>,
        req: &'a Request,
        res: &'a mut dyn ResponseWriter,
        params: ParamVec,
    ) -> Context<'a> {
        Context::new(self, route, req, res, params)
    }

    /// Path helpers of every route keyed by name; the first route holding a name wins
    #[must_use]
    pub fn path_helpers(&self) -> BTreeMap<String, PathHelper> {
        let mut helpers = BTreeMap::new();
        for route in &self.routes {
            helpers
                .entry(route.path_name().to_string())
                .or_insert_with(|| route.build_path_helper());
        }
        helpers
    }

    /// Build a URL with the path helper called `name`
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnknownRoute`] when no route has that name, otherwise
    /// whatever [`PathHelper::call`] reports.
    pub fn path_for(&self, name: &str, params: &Params) -> Result<SafeUrl, RouteError> {
        let route = self.route_named(name).ok_or_else(|| RouteError::UnknownRoute {
            name: name.to_string(),
        })?;
        route.build_path_helper().call(params)
    }

    /// Install every path helper as a template function taking keyword arguments:
    /// `{{ widgetPath(id=5, page=2) }}`.
    pub fn register_path_helpers(&self, env: &mut minijinja::Environment<'_>) {
        for (name, helper) in self.path_helpers() {
            env.add_function(name, move |kwargs: Kwargs| -> Result<minijinja::Value, minijinja::Error> {
                let mut params = Params::new();
                let keys: Vec<String> = kwargs.args().map(str::to_string).collect();
                for key in keys {
                    let value: minijinja::Value = kwargs.get(&key)?;
                    params.insert(key, template_param(&value));
                }
                helper.call(&params).map(minijinja::Value::from).map_err(|e| {
                    minijinja::Error::new(minijinja::ErrorKind::InvalidOperation, e.to_string())
                })
            });
        }
    }

    /// Route `req` through the matcher and serve it.
    ///
    /// Unmatched paths are answered by the `404` error handler, paths matched only
    /// under other methods by the `405` handler (with an `Allow` header).
    pub fn serve(&self, req: Request, res: &mut dyn ResponseWriter) {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        match self.router.route(&method, &path) {
            Lookup::Matched { target, params } => match self.route(target) {
                Some(route) => route.serve(self, req, params, res),
                None => {
                    error!(route_id = %target, route_path = %path, "Matcher returned an unknown route");
                    self.serve_error(req, res, HttpError::not_found(format!("path not found: {method} {path}")));
                }
            },
            Lookup::MethodNotAllowed { allowed } => {
                let allow = allowed
                    .iter()
                    .map(Method::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                if let Ok(value) = HeaderValue::from_str(&allow) {
                    res.headers_mut().insert(ALLOW, value);
                }
                self.serve_error(
                    req,
                    res,
                    HttpError::method_not_allowed(format!("method {method} not allowed for {path}")),
                );
            }
            Lookup::NotFound => {
                self.serve_error(req, res, HttpError::not_found(format!("path not found: {method} {path}")));
            }
        }
    }

    fn serve_error(&self, req: Request, res: &mut dyn ResponseWriter, err: HttpError) {
        let mut ctx = self.new_context(None, &req, res, ParamVec::new());
        dispatcher::handle_error(&mut ctx, err.into());
        ctx.finish();
    }

    /// Serve `req` in-process and return the recorded response
    #[must_use]
    pub fn handle(&self, req: Request) -> http::Response<Vec<u8>> {
        let mut res = RecordedResponse::new();
        self.serve(req, &mut res);
        res.into_response()
    }

    /// Human-readable route table, one line per route
    #[must_use]
    pub fn routes_table(&self) -> String {
        let header = ["METHOD", "PATH", "ALIASES", "NAME", "HANDLER"];
        let rows: Vec<[String; 5]> = self
            .routes
            .iter()
            .map(|r| {
                [
                    r.method().to_string(),
                    r.path().to_string(),
                    r.aliases().join(" "),
                    r.path_name().to_string(),
                    r.handler_name().to_string(),
                ]
            })
            .collect();

        let mut widths = header.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        let mut out = String::new();
        let mut line = |cells: [&str; 5]| {
            let text = cells
                .iter()
                .zip(widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join(" | ");
            let _ = writeln!(out, "{}", text.trim_end());
        };
        line(header);
        line(widths.map(|w| "-".repeat(w)).each_ref().map(String::as_str));
        for row in &rows {
            line(row.each_ref().map(String::as_str));
        }
        out
    }

    /// Freeze the application for serving from many workers
    #[must_use]
    pub fn into_shared(self) -> Arc<App> {
        Arc::new(self)
    }
}

fn template_param(value: &minijinja::Value) -> ParamValue {
    match value.kind() {
        ValueKind::Bool => ParamValue::Bool(value.is_true()),
        ValueKind::Number => match i64::try_from(value.clone()) {
            Ok(i) => ParamValue::Int(i),
            Err(_) => f64::try_from(value.clone())
                .map(ParamValue::Float)
                .unwrap_or_else(|_| ParamValue::Str(value.to_string())),
        },
        _ => value
            .as_str()
            .map_or_else(|| ParamValue::Str(value.to_string()), ParamValue::from),
    }
}

impl Service for App {
    fn call(&self, req: Request, res: &mut dyn ResponseWriter) {
        self.serve(req, res);
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("routes", &self.routes)
            .field("middleware", &self.middleware)
            .finish_non_exhaustive()
    }
}

/// One route of a shared [`App`], installable on its own as a request target.
///
/// Placeholder values are taken from the first of the route's primary and alias
/// patterns that matches the request path; the matcher is not consulted.
#[derive(Clone)]
pub struct RouteTarget {
    app: Arc<App>,
    id: RouteId,
}

impl RouteTarget {
    /// `None` when `id` is not a route of `app`
    #[must_use]
    pub fn new(app: Arc<App>, id: RouteId) -> Option<Self> {
        app.route(id)?;
        Some(Self { app, id })
    }

    #[must_use]
    pub fn route(&self) -> &RouteInfo {
        self.app.route_ref(self.id)
    }
}

impl Service for RouteTarget {
    fn call(&self, req: Request, res: &mut dyn ResponseWriter) {
        let route = self.app.route_ref(self.id);
        let params = route.captures(req.uri().path()).unwrap_or_default();
        route.serve(&self.app, req, params, res);
    }
}
