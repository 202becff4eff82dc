use std::time::Instant;

use tracing::{field, info_span, warn};

use super::{Middleware, Next};
use crate::context::Context;
use crate::dispatcher::HandlerResult;

/// Opens a `request` span around each handler call and records its outcome.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn handle(&self, ctx: &mut Context<'_>, next: Next<'_>) -> HandlerResult {
        let handler = ctx.route().map_or("", |r| r.handler_name());
        let span = info_span!(
            "request",
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            path = %ctx.path(),
            handler = %handler,
            status = field::Empty,
            latency_ms = field::Empty,
            failed = field::Empty,
        );
        let _guard = span.enter();
        let start = Instant::now();

        let result = next.run(ctx);

        let latency = start.elapsed();
        span.record("latency_ms", latency.as_millis() as u64);
        if let Some(status) = ctx.response().status() {
            span.record("status", status.as_u16());
        }
        span.record("failed", result.is_err());
        if let Err(e) = &result {
            warn!(error = %e, latency_ms = latency.as_millis() as u64, "Handler returned an error");
        }
        result
    }
}
