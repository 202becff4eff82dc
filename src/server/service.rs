use super::request::Request;
use super::response::{RecordedResponse, ResponseWriter};
use std::sync::Arc;

/// Anything that can be installed as a request target of a server.
///
/// Implemented by [`App`](crate::App) (routes through its matcher) and by
/// [`RouteTarget`](crate::RouteTarget) (serves one route descriptor directly).
/// A server integration calls `call` once per inbound request from whatever
/// worker it dispatches on; implementations hold no per-request shared state.
pub trait Service: Send + Sync {
    fn call(&self, req: Request, res: &mut dyn ResponseWriter);

    /// Serve `req` in-process and collect the response
    fn oneshot(&self, req: Request) -> http::Response<Vec<u8>>
    where
        Self: Sized,
    {
        let mut res = RecordedResponse::new();
        self.call(req, &mut res);
        res.into_response()
    }
}

impl<S: Service + ?Sized> Service for Arc<S> {
    fn call(&self, req: Request, res: &mut dyn ResponseWriter) {
        (**self).call(req, res);
    }
}
