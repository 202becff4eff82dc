use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use anyhow::anyhow;
use http::StatusCode;
use tracing::{debug, error, info, warn};

use crate::app::App;
use crate::context::Context;
use crate::error::status_of;
use crate::route::RouteInfo;
use crate::router::ParamVec;
use crate::server::{Request, ResponseWriter};

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Serve one request with `route`: run its handler inside the middleware chain,
/// then route any failure through [`handle_error`].
pub(crate) fn serve(app: &App, route: &RouteInfo, req: Request, params: ParamVec, res: &mut dyn ResponseWriter) {
    let start = Instant::now();
    let mut ctx = app.new_context(Some(route), &req, res, params);
    let request_id = ctx.request_id();

    debug!(
        request_id = %request_id,
        method = %route.method(),
        path = %req.uri().path(),
        route_path = %route.path(),
        handler_name = %route.handler_name(),
        path_params = ?ctx.path_params(),
        "Handler execution start"
    );

    let wrapped = app.middleware().handler(route);
    let result = panic::catch_unwind(AssertUnwindSafe(|| wrapped.call(&mut ctx)))
        .unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            error!(
                request_id = %request_id,
                handler_name = %route.handler_name(),
                panic_message = %message,
                "Handler panicked - CRITICAL"
            );
            Err(anyhow!("handler panicked: {message}"))
        });

    match result {
        Ok(()) => info!(
            request_id = %request_id,
            handler_name = %route.handler_name(),
            status = ctx.response().status().unwrap_or(StatusCode::OK).as_u16(),
            execution_time_ms = start.elapsed().as_millis() as u64,
            "Handler execution complete"
        ),
        Err(err) => handle_error(&mut ctx, err),
    }
    ctx.finish();
}

/// Answer a failed request.
///
/// Persists pending flash messages, classifies `err` into a status and runs the
/// error handler registered for it. If that handler fails too, a bare `500` with
/// the handler's failure message is written, replacing any status the error
/// handler had already set.
pub(crate) fn handle_error(ctx: &mut Context<'_>, err: anyhow::Error) {
    ctx.persist_flash();

    let status = status_of(&err);
    let request_id = ctx.request_id();
    let handler_name = ctx.route().map_or("", |r| r.handler_name());
    if status.is_server_error() {
        error!(
            request_id = %request_id,
            handler_name = %handler_name,
            status = status.as_u16(),
            error = %format!("{err:#}"),
            "Request failed"
        );
    } else {
        warn!(
            request_id = %request_id,
            handler_name = %handler_name,
            status = status.as_u16(),
            error = %err,
            "Request failed"
        );
    }

    let error_handler = ctx.app().error_handlers().get(status);
    if let Err(fatal) = error_handler.call(status, &err, ctx) {
        error!(
            request_id = %request_id,
            status = status.as_u16(),
            original_error = %err,
            error = %fatal,
            "Error handler failed - CRITICAL"
        );
        let response = ctx.response();
        response.force_status(StatusCode::INTERNAL_SERVER_ERROR);
        if let Err(e) = response.write(fatal.to_string().as_bytes()) {
            error!(request_id = %request_id, error = %e, "Failed to write fallback response");
        }
    }
}
