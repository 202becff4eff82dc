use crate::context::Context;
use crate::server::status_reason;
use http::StatusCode;
use serde_json::json;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::handler::HandlerResult;

type ErrorFn = dyn Fn(StatusCode, &anyhow::Error, &mut Context<'_>) -> HandlerResult + Send + Sync;

/// Callback that renders the response for a failed request
#[derive(Clone)]
pub struct ErrorHandler(Arc<ErrorFn>);

impl ErrorHandler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(StatusCode, &anyhow::Error, &mut Context<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Render the response for `err`, classified as `status`
    ///
    /// # Errors
    ///
    /// Whatever the callback returns; the dispatcher answers such failures with a bare 500.
    pub fn call(&self, status: StatusCode, err: &anyhow::Error, ctx: &mut Context<'_>) -> HandlerResult {
        (*self.0)(status, err, ctx)
    }
}

impl fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ErrorHandler")
    }
}

/// Error handlers keyed by status code, with a fallback for unlisted statuses.
#[derive(Debug, Clone)]
pub struct ErrorHandlers {
    handlers: HashMap<StatusCode, ErrorHandler>,
    default: ErrorHandler,
}

impl Default for ErrorHandlers {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
            default: ErrorHandler::new(default_error_handler),
        }
    }
}

impl ErrorHandlers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the handler for `status`, returning the one it replaces
    pub fn set<F>(&mut self, status: StatusCode, f: F) -> Option<ErrorHandler>
    where
        F: Fn(StatusCode, &anyhow::Error, &mut Context<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handlers.insert(status, ErrorHandler::new(f))
    }

    /// Replace the fallback used for statuses without a dedicated handler
    pub fn set_default<F>(&mut self, f: F)
    where
        F: Fn(StatusCode, &anyhow::Error, &mut Context<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.default = ErrorHandler::new(f);
    }

    pub fn remove(&mut self, status: StatusCode) -> Option<ErrorHandler> {
        self.handlers.remove(&status)
    }

    #[must_use]
    pub fn contains(&self, status: StatusCode) -> bool {
        self.handlers.contains_key(&status)
    }

    /// The handler for `status`, or the fallback
    #[must_use]
    pub fn get(&self, status: StatusCode) -> &ErrorHandler {
        self.handlers.get(&status).unwrap_or(&self.default)
    }
}

/// Fallback error handler.
///
/// Answers with JSON `{"error": ..., "code": ...}` when the client accepts JSON and
/// plain text otherwise. Outside development, messages of server errors are
/// replaced by the status reason; in development the error's cause chain is added.
///
/// # Errors
///
/// Fails only if the response cannot be written.
pub fn default_error_handler(status: StatusCode, err: &anyhow::Error, ctx: &mut Context<'_>) -> HandlerResult {
    let development = ctx.app().config().env.is_development();
    let message = if development || !status.is_server_error() {
        err.to_string()
    } else {
        status_reason(status).to_string()
    };
    let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();

    if ctx.accepts_json() {
        let mut body = json!({ "error": message, "code": status.as_u16() });
        if development {
            body["trace"] = json!(causes);
        }
        ctx.render_json(status, &body)
    } else {
        let mut text = message;
        if development {
            for cause in &causes {
                text.push_str("\ncaused by: ");
                text.push_str(cause);
            }
        }
        ctx.render_text(status, text)
    }
}
