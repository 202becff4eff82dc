//! # Dispatcher Module
//!
//! Runs a matched route's handler and turns failures into responses.
//!
//! ## Serving a Request
//!
//! 1. A [`Context`](crate::context::Context) is built for the request.
//! 2. The route's [`Handler`] runs inside the application's middleware chain.
//!    A panic in the handler is caught and treated as an error.
//! 3. On error, flash messages are persisted and the error is classified: an
//!    [`HttpError`](crate::HttpError) anywhere at the root of the chain gives its
//!    status, anything else is `500`.
//! 4. The [`ErrorHandler`] registered for that status (or the default) renders the
//!    response.
//! 5. If the error handler itself fails, the request is answered with a bare
//!    `500 Internal Server Error` whose body is that failure's message.
//!
//! ## Custom Error Pages
//!
//! ```rust
//! use http::StatusCode;
//! use routekit::{App, AppConfig};
//!
//! let mut app = App::new(AppConfig::default());
//! app.error_handlers_mut().set(StatusCode::NOT_FOUND, |status, _err, ctx| {
//!     ctx.render_text(status, "nothing here")
//! });
//! ```

mod core;
mod errors;
mod handler;

pub(crate) use core::{handle_error, serve};
pub use errors::{default_error_handler, ErrorHandler, ErrorHandlers};
pub use handler::{Handler, HandlerResult};
