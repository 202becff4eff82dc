//! # Error Module
//!
//! Error types shared by registration, URL reconstruction and request dispatch.
//!
//! - [`RouteError`] covers everything that can go wrong while registering routes or
//!   rendering a path helper (bad patterns, missing parameters, name collisions).
//! - [`HttpError`] is the error kind handlers return when a failure should be answered
//!   with a specific HTTP status. The dispatcher classifies any handler error with
//!   [`status_of`], which inspects the root cause of the error chain.

use crate::router::RouteId;
use http::StatusCode;
use std::fmt;

/// Errors raised while registering routes or reconstructing URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The path pattern could not be compiled by the matcher
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Why it was rejected
        reason: String,
    },
    /// One or more placeholders of the pattern had no value in the parameter bag
    MissingParams {
        /// The route's path pattern
        path: String,
        /// Placeholder names with no supplied value, in pattern order
        missing: Vec<String>,
    },
    /// A supplied value does not satisfy the placeholder's constraint
    InvalidParam {
        /// The route's path pattern
        path: String,
        /// The placeholder name
        param: String,
        /// The rejected value
        value: String,
    },
    /// The requested route name normalizes to an empty string
    InvalidName {
        /// The name as supplied by the caller
        name: String,
    },
    /// The canonical name is already held by a route with a different path pattern
    DuplicateName {
        /// The normalized name
        name: String,
        /// The path pattern of the route that already owns the name
        existing_path: String,
    },
    /// The `(method, pattern)` pair already dispatches to another route
    PatternConflict {
        method: String,
        pattern: String,
        /// The route the pair dispatches to
        existing: RouteId,
    },
    /// No route carries the requested canonical name
    UnknownRoute {
        /// The name looked up
        name: String,
    },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::InvalidPattern { pattern, reason } => {
                write!(f, "invalid path pattern '{pattern}': {reason}")
            }
            RouteError::MissingParams { path, missing } => {
                write!(
                    f,
                    "missing parameters for {path}: {}",
                    missing.join(", ")
                )
            }
            RouteError::InvalidParam { path, param, value } => {
                write!(
                    f,
                    "invalid value '{value}' for parameter '{param}' of {path}"
                )
            }
            RouteError::InvalidName { name } => {
                write!(f, "invalid route name '{name}'")
            }
            RouteError::DuplicateName {
                name,
                existing_path,
            } => {
                write!(
                    f,
                    "route name '{name}' is already used by {existing_path}"
                )
            }
            RouteError::PatternConflict {
                method,
                pattern,
                existing,
            } => {
                write!(f, "{method} {pattern} already dispatches to route {existing}")
            }
            RouteError::UnknownRoute { name } => write!(f, "no route named '{name}'"),
        }
    }
}

impl std::error::Error for RouteError {}

/// A failure that should be answered with a specific HTTP status.
///
/// Return it from a handler (directly or wrapped with additional
/// [`anyhow::Context`]) and the dispatcher routes it to the error handler
/// registered for [`HttpError::status`].
///
/// `HttpError` deliberately has no [`source`](std::error::Error::source): it is the
/// root of whatever chain it ends up in, so root-cause classification finds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    /// Create an error carrying `status` and a human-readable message
    pub fn new(status: StatusCode, message: impl fmt::Display) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl fmt::Display) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 401 Unauthorized
    pub fn unauthorized(message: impl fmt::Display) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// 403 Forbidden
    pub fn forbidden(message: impl fmt::Display) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// 404 Not Found
    pub fn not_found(message: impl fmt::Display) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// 405 Method Not Allowed
    pub fn method_not_allowed(message: impl fmt::Display) -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, message)
    }

    /// 501 Not Implemented
    pub fn not_implemented(message: impl fmt::Display) -> Self {
        Self::new(StatusCode::NOT_IMPLEMENTED, message)
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

/// Resolve the HTTP status for a handler failure.
///
/// Unwraps `err` to its root cause; when that cause is an [`HttpError`] its status
/// is used, otherwise the failure is a 500.
#[must_use]
pub fn status_of(err: &anyhow::Error) -> StatusCode {
    err.root_cause()
        .downcast_ref::<HttpError>()
        .map(HttpError::status)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
