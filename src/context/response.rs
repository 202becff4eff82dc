use crate::server::ResponseWriter;
use http::{HeaderMap, StatusCode};
use std::io;
use tracing::warn;

/// Response handle given to handlers through the [`Context`](super::Context).
///
/// Tracks the committed status and the number of body bytes written. The first
/// status written wins; later `write_header` calls are dropped with a warning.
pub struct Response<'a> {
    writer: &'a mut dyn ResponseWriter,
    status: Option<StatusCode>,
    size: usize,
}

impl<'a> Response<'a> {
    pub(crate) fn new(writer: &'a mut dyn ResponseWriter) -> Self {
        Self {
            writer,
            status: None,
            size: 0,
        }
    }

    /// Headers still to be sent; changes after the status is committed are lost
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        self.writer.headers_mut()
    }

    pub fn write_header(&mut self, status: StatusCode) {
        if let Some(committed) = self.status {
            warn!(
                committed = committed.as_u16(),
                ignored = status.as_u16(),
                "Superfluous write_header call"
            );
            return;
        }
        self.status = Some(status);
        self.writer.write_header(status);
    }

    /// Commit `status` even if another status was already written.
    pub(crate) fn force_status(&mut self, status: StatusCode) {
        if let Some(committed) = self.status.filter(|c| *c != status) {
            warn!(
                committed = committed.as_u16(),
                forced = status.as_u16(),
                "Overriding committed status"
            );
        }
        self.status = Some(status);
        self.writer.force_header(status);
    }

    /// Append body bytes, committing `200 OK` first if no status was written.
    ///
    /// # Errors
    ///
    /// Propagates the underlying writer's I/O error.
    pub fn write(&mut self, body: &[u8]) -> io::Result<usize> {
        if self.status.is_none() {
            self.write_header(StatusCode::OK);
        }
        let written = self.writer.write(body)?;
        self.size += written;
        Ok(written)
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.status.is_some()
    }

    /// Body bytes written so far
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }
}
