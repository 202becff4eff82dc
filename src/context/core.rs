use crate::app::App;
use crate::error::{HttpError, RouteError};
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use crate::dispatcher::HandlerResult;
use crate::params::Params;
use crate::route::{RouteInfo, SafeUrl};
use crate::router::ParamVec;
use crate::server::{parse_cookies, parse_query_params, Request};
use http::header::{ACCEPT, CONTENT_TYPE, LOCATION, SET_COOKIE};
use http::{HeaderValue, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

use super::flash::Flash;
use super::response::Response;
use super::session::Session;

/// Everything a handler sees about the request it is serving.
///
/// Created once per request by [`App::new_context`]; borrows the application,
/// the matched route (absent for not-found and method-not-allowed responses),
/// the request and the response sink for the duration of the request.
pub struct Context<'a> {
    app: &'a App,
    route: Option<&'a RouteInfo>,
    request: &'a Request,
    request_id: RequestId,
    path_params: ParamVec,
    query_params: ParamVec,
    session: Session,
    flash: Flash,
    data: HashMap<String, Value>,
    response: Response<'a>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        app: &'a App,
        route: Option<&'a RouteInfo>,
        request: &'a Request,
        writer: &'a mut dyn crate::server::ResponseWriter,
        path_params: ParamVec,
    ) -> Self {
        let request_id = RequestId::from_headers_or_new(request.headers());
        let query_params = parse_query_params(request.uri().query());
        let mut response = Response::new(writer);

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        let cookie_name = app.config().session_cookie.as_str();
        let mut session = match parse_cookies(request.headers()).remove(cookie_name) {
            Some(id) if !id.is_empty() => {
                let values = app.sessions().load(&id).unwrap_or_default();
                Session::restore(id, values)
            }
            _ => Session::new(ulid::Ulid::new().to_string()),
        };
        if session.is_fresh() {
            let cookie = format!(
                "{cookie_name}={}; Path=/; HttpOnly; SameSite=Lax",
                session.id()
            );
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    response.headers_mut().append(SET_COOKIE, value);
                }
                Err(e) => warn!(error = %e, "Session cookie is not a valid header value"),
            }
        }
        let flash = Flash::from_session(&mut session);

        Self {
            app,
            route,
            request,
            request_id,
            path_params,
            query_params,
            session,
            flash,
            data: HashMap::new(),
            response,
        }
    }

    #[must_use]
    pub fn app(&self) -> &'a App {
        self.app
    }

    /// The route being served, `None` when no route matched
    #[must_use]
    pub fn route(&self) -> Option<&'a RouteInfo> {
        self.route
    }

    #[must_use]
    pub fn request(&self) -> &'a Request {
        self.request
    }

    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    #[must_use]
    pub fn method(&self) -> &'a Method {
        self.request.method()
    }

    #[must_use]
    pub fn path(&self) -> &'a str {
        self.request.uri().path()
    }

    /// Look up a request parameter: path placeholders first, then the query string.
    ///
    /// For repeated names the last occurrence wins.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rev()
            .chain(self.query_params.iter().rev())
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn path_params(&self) -> &ParamVec {
        &self.path_params
    }

    #[must_use]
    pub fn query_params(&self) -> &ParamVec {
        &self.query_params
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    #[must_use]
    pub fn flash(&self) -> &Flash {
        &self.flash
    }

    pub fn flash_mut(&mut self) -> &mut Flash {
        &mut self.flash
    }

    /// Move pending flash messages into the session so they outlive this request
    pub fn persist_flash(&mut self) {
        self.flash.persist(&mut self.session);
    }

    /// Store a request-scoped value
    ///
    /// # Errors
    ///
    /// Fails if `value` cannot be represented as JSON.
    pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> serde_json::Result<()> {
        self.data.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    #[must_use]
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn response(&mut self) -> &mut Response<'a> {
        &mut self.response
    }

    /// Build a URL from the application's path helper registered as `name`
    ///
    /// # Errors
    ///
    /// See [`App::path_for`].
    pub fn path_for(&self, name: &str, params: &Params) -> Result<SafeUrl, RouteError> {
        self.app.path_for(name, params)
    }

    /// Whether the client asked for JSON
    #[must_use]
    pub fn accepts_json(&self) -> bool {
        let header_has_json = |name: http::header::HeaderName| {
            self.request
                .headers()
                .get_all(name)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .any(|v| v.contains("json"))
        };
        header_has_json(ACCEPT) || header_has_json(CONTENT_TYPE)
    }

    /// Serialize `value` as the JSON body with `status`
    ///
    /// # Errors
    ///
    /// Fails when serialization or the underlying write fails.
    pub fn render_json<T: Serialize + ?Sized>(&mut self, status: StatusCode, value: &T) -> HandlerResult {
        let body = serde_json::to_vec(value)?;
        self.render_bytes(status, "application/json", &body)
    }

    /// Write `text` as a `text/plain` body with `status`
    ///
    /// # Errors
    ///
    /// Fails when the underlying write fails.
    pub fn render_text(&mut self, status: StatusCode, text: impl AsRef<str>) -> HandlerResult {
        self.render_bytes(status, "text/plain; charset=utf-8", text.as_ref().as_bytes())
    }

    /// Write `body` with an explicit content type
    ///
    /// # Errors
    ///
    /// Fails when the underlying write fails.
    pub fn render_bytes(&mut self, status: StatusCode, content_type: &'static str, body: &[u8]) -> HandlerResult {
        self.response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        self.response.write_header(status);
        self.response.write(body)?;
        Ok(())
    }

    /// Redirect to `location`, keeping pending flash messages for the next request.
    ///
    /// # Errors
    ///
    /// Fails when `status` is not a redirection or `location` is not a valid header value.
    pub fn redirect(&mut self, status: StatusCode, location: &str) -> HandlerResult {
        if !status.is_redirection() {
            return Err(HttpError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("cannot redirect with status {status}"),
            )
            .into());
        }
        let value = HeaderValue::from_str(location)?;
        self.persist_flash();
        self.response.headers_mut().insert(LOCATION, value);
        self.response.write_header(status);
        debug!(request_id = %self.request_id, status = status.as_u16(), location = %location, "Redirect");
        Ok(())
    }

    /// Redirect to the URL the named path helper builds from `params`
    ///
    /// # Errors
    ///
    /// Fails when the helper is unknown or rejects `params`, or as [`Context::redirect`].
    pub fn redirect_to(&mut self, status: StatusCode, name: &str, params: &Params) -> HandlerResult {
        let url = self.path_for(name, params)?;
        self.redirect(status, url.as_str())
    }

    /// Wrap `cause` in an error that the dispatcher will route to the handler for `status`.
    ///
    /// ```rust,ignore
    /// return Err(ctx.error(StatusCode::NOT_FOUND, "widget not found"));
    /// ```
    #[must_use]
    pub fn error(&self, status: StatusCode, cause: impl fmt::Display) -> anyhow::Error {
        HttpError::new(status, cause).into()
    }

    /// Save the session if this request changed it
    pub(crate) fn finish(self) {
        if self.session.is_dirty() {
            self.app
                .sessions()
                .save(self.session.id(), self.session.values());
            debug!(request_id = %self.request_id, session_id = %self.session.id(), "Session saved");
        }
    }
}
