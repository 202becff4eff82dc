//! # Context Module
//!
//! Per-request state handed to handlers, middleware and error handlers: the
//! request and its parameters, the response sink, the visitor's session and the
//! flash messages carried in it.
//!
//! Sessions are identified by a cookie (named by
//! [`AppConfig::session_cookie`](crate::config::AppConfig)) and stored in the
//! application's [`SessionStore`]. A new session sends its cookie as soon as the
//! context is created; a changed session is saved when the request completes.

mod core;
mod flash;
mod response;
mod session;

pub use core::Context;
pub use flash::{Flash, FLASH_KEY};
pub use response::Response;
pub use session::{MemorySessionStore, Session, SessionStore, SessionValues};
