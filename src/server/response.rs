use http::{HeaderMap, StatusCode};
use std::borrow::Cow;
use std::io;

/// Sink a response is written into.
///
/// Mirrors the shape of a classic server response writer: headers are mutable
/// until the status line is written, `write_header` sends the status, and
/// `write` appends body bytes (implying `200 OK` if no status was sent yet).
pub trait ResponseWriter {
    fn headers_mut(&mut self) -> &mut HeaderMap;
    fn write_header(&mut self, status: StatusCode);
    fn write(&mut self, body: &[u8]) -> io::Result<usize>;

    /// Replace the status even when one was already written.
    ///
    /// Sinks that have already sent the status line cannot honour this; the
    /// default forwards to `write_header`.
    fn force_header(&mut self, status: StatusCode) {
        self.write_header(status);
    }
}

/// In-memory [`ResponseWriter`] that records everything written to it.
///
/// Used for in-process serving and in tests; it also counts the raw
/// `write_header` / `write` calls it received.
#[derive(Debug, Clone, Default)]
pub struct RecordedResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
    header_writes: usize,
    body_writes: usize,
}

impl RecordedResponse {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Status written so far, or `200 OK` when nothing was written (the
    /// implicit status of an untouched response).
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// Whether a status line has been committed
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.status.is_some()
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    #[must_use]
    pub fn body_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Number of `write_header` calls received
    #[must_use]
    pub fn header_writes(&self) -> usize {
        self.header_writes
    }

    /// Number of `write` calls received
    #[must_use]
    pub fn body_writes(&self) -> usize {
        self.body_writes
    }

    /// Convert into an `http::Response`
    #[must_use]
    pub fn into_response(self) -> http::Response<Vec<u8>> {
        let status = self.status();
        let mut response = http::Response::new(self.body);
        *response.status_mut() = status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseWriter for RecordedResponse {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_header(&mut self, status: StatusCode) {
        self.header_writes += 1;
        if self.status.is_none() {
            self.status = Some(status);
        }
    }

    fn force_header(&mut self, status: StatusCode) {
        self.header_writes += 1;
        self.status = Some(status);
    }

    fn write(&mut self, body: &[u8]) -> io::Result<usize> {
        self.body_writes += 1;
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.body.extend_from_slice(body);
        Ok(body.len())
    }
}

/// Reason phrase for a status, falling back to `"Unknown"`
#[must_use]
pub fn status_reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown")
}
