use crate::app::App;
use crate::error::RouteError;
use crate::router::RouteId;
use std::fmt;
use tracing::info;

use super::core::RouteInfo;
use super::naming;

/// Mutable handle on a registered route, returned by the registration methods of
/// [`App`] so a route can be given aliases and a name right away:
///
/// ```rust
/// use routekit::{App, AppConfig};
///
/// let mut app = App::new(AppConfig::default());
/// app.get("/widgets/{id}", |ctx| ctx.render_text(http::StatusCode::OK, "widget"))?
///     .alias(["/gadgets/{id}"])?
///     .name("widget")?;
/// assert!(app.route_named("widgetPath").is_some());
/// # Ok::<(), routekit::RouteError>(())
/// ```
pub struct RouteMut<'a> {
    app: &'a mut App,
    id: RouteId,
}

impl<'a> RouteMut<'a> {
    pub(crate) fn new(app: &'a mut App, id: RouteId) -> Self {
        Self { app, id }
    }

    #[must_use]
    pub fn id(&self) -> RouteId {
        self.id
    }

    #[must_use]
    pub fn info(&self) -> &RouteInfo {
        self.app.route_ref(self.id)
    }

    /// Register each of `patterns` as another path dispatching to this route,
    /// under the route's method. The route's own path and name are unchanged.
    ///
    /// # Errors
    ///
    /// Fails on the first pattern that does not compile
    /// ([`RouteError::InvalidPattern`]) or that already dispatches to another
    /// route under this method ([`RouteError::PatternConflict`]). Patterns before
    /// it stay registered; the failing one is not recorded as an alias.
    pub fn alias<I, S>(self, patterns: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let method = self.info().method().clone();
            let compiled = self.app.router_mut().register(method.clone(), pattern, self.id)?;
            self.app.route_mut_ref(self.id).push_alias(compiled);
            info!(
                method = %method,
                route_path = %self.info().path(),
                alias = %pattern,
                "Route alias registered"
            );
        }
        Ok(self)
    }

    /// Rename this route's path helper.
    ///
    /// `candidate` is camelized and suffixed with `Path` (`"show widget"` becomes
    /// `showWidgetPath`). Routes sharing a path pattern may share a name.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidName`] when `candidate` has no usable
    /// characters and [`RouteError::DuplicateName`] when the name already belongs
    /// to a route with a different path.
    pub fn name(self, candidate: &str) -> Result<Self, RouteError> {
        let name = naming::normalize_name(candidate)?;
        let path = self.info().path().to_string();
        if let Some(owner) = self
            .app
            .routes()
            .iter()
            .find(|r| r.id() != self.id && r.path_name() == name && r.path() != path)
        {
            return Err(RouteError::DuplicateName {
                name,
                existing_path: owner.path().to_string(),
            });
        }

        let previous = self.app.route_mut_ref(self.id).set_path_name(name.clone());
        info!(
            route_path = %path,
            previous_name = %previous,
            path_name = %name,
            "Route renamed"
        );
        Ok(self)
    }
}

impl fmt::Debug for RouteMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMut")
            .field("id", &self.id)
            .field("info", self.info())
            .finish()
    }
}
