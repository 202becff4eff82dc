use crate::context::Context;

/// Outcome of a handler: success means the response has been written
pub type HandlerResult = anyhow::Result<()>;

/// Request handler bound to a route.
///
/// Any `Fn(&mut Context<'_>) -> HandlerResult` closure or function is a handler.
/// Errors carrying an [`HttpError`](crate::HttpError) select the error handler for
/// its status; every other error is treated as `500 Internal Server Error`.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: &mut Context<'_>) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&mut Context<'_>) -> HandlerResult + Send + Sync + 'static,
{
    fn call(&self, ctx: &mut Context<'_>) -> HandlerResult {
        self(ctx)
    }
}
