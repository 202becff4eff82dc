//! # Server Module
//!
//! The seam between this crate and whatever HTTP server runs it. The server owns
//! listening and connection handling; it hands each request to a [`Service`]
//! together with a [`ResponseWriter`] sink.

pub mod request;
pub mod response;
pub mod service;

pub use request::{parse_cookies, parse_query_params, Request};
pub use response::{status_reason, RecordedResponse, ResponseWriter};
pub use service::Service;
