use crate::context::Context;
use crate::dispatcher::{Handler, HandlerResult};
use crate::route::RouteInfo;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// A layer wrapped around every route handler.
///
/// Middleware decides whether and when the rest of the chain runs by calling
/// [`Next::run`]; returning without calling it short-circuits the request.
pub trait Middleware: Send + Sync {
    fn handle(&self, ctx: &mut Context<'_>, next: Next<'_>) -> HandlerResult;
}

/// The remainder of a middleware chain, ending in the route handler
#[derive(Clone, Copy)]
pub struct Next<'a> {
    chain: &'a [&'a dyn Middleware],
    handler: &'a dyn Handler,
}

impl<'a> Next<'a> {
    pub fn run(self, ctx: &mut Context<'_>) -> HandlerResult {
        match self.chain.split_first() {
            Some((first, rest)) => first.handle(
                ctx,
                Next {
                    chain: rest,
                    handler: self.handler,
                },
            ),
            None => self.handler.call(ctx),
        }
    }
}

/// Middleware built from a closure, see [`from_fn`]
pub struct FnMiddleware<F>(F);

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(&mut Context<'_>, Next<'_>) -> HandlerResult + Send + Sync,
{
    fn handle(&self, ctx: &mut Context<'_>, next: Next<'_>) -> HandlerResult {
        (self.0)(ctx, next)
    }
}

/// Turn a closure into middleware
pub fn from_fn<F>(f: F) -> FnMiddleware<F>
where
    F: Fn(&mut Context<'_>, Next<'_>) -> HandlerResult + Send + Sync,
{
    FnMiddleware(f)
}

#[derive(Clone)]
struct Layer {
    key: String,
    middleware: Arc<dyn Middleware>,
    skipped: HashSet<String>,
}

/// Ordered middleware applied to an application's routes.
///
/// Each layer has a key (the middleware's type name unless pushed with
/// [`MiddlewareStack::push_named`]) that [`MiddlewareStack::skip`] refers to.
#[derive(Clone, Default)]
pub struct MiddlewareStack {
    layers: Vec<Layer>,
}

impl MiddlewareStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `middleware`, keyed by its type name
    pub fn push<M: Middleware + 'static>(&mut self, middleware: M) {
        self.push_named(key_of::<M>(), Arc::new(middleware));
    }

    /// Append middleware the caller keeps a handle to, keyed by its type name
    pub fn push_shared<M: Middleware + 'static>(&mut self, middleware: Arc<M>) {
        self.push_named(key_of::<M>(), middleware);
    }

    /// Append `middleware` under an explicit key
    pub fn push_named(&mut self, key: impl Into<String>, middleware: Arc<dyn Middleware>) {
        let key = key.into();
        debug!(middleware = %key, position = self.layers.len(), "Middleware added");
        self.layers.push(Layer {
            key,
            middleware,
            skipped: HashSet::new(),
        });
    }

    /// Do not run the layer keyed `key` for routes served by the named handlers.
    ///
    /// Returns `false` if no layer has that key.
    pub fn skip<I, S>(&mut self, key: &str, handler_names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Some(layer) = self.layers.iter_mut().find(|l| l.key == key) else {
            warn!(middleware = %key, "Cannot skip unknown middleware");
            return false;
        };
        layer.skipped.extend(handler_names.into_iter().map(Into::into));
        true
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layer keys in execution order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|l| l.key.as_str())
    }

    /// The handler of `route` wrapped in every layer not skipped for it
    #[must_use]
    pub fn handler<'a>(&'a self, route: &'a RouteInfo) -> Wrapped<'a> {
        let chain = self
            .layers
            .iter()
            .filter(|l| !l.skipped.contains(route.handler_name()))
            .map(|l| l.middleware.as_ref())
            .collect();
        Wrapped {
            chain,
            handler: route.handler(),
        }
    }
}

impl fmt::Debug for MiddlewareStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

/// A route handler with its middleware chain resolved
pub struct Wrapped<'a> {
    chain: Vec<&'a dyn Middleware>,
    handler: &'a dyn Handler,
}

impl Wrapped<'_> {
    pub fn call(&self, ctx: &mut Context<'_>) -> HandlerResult {
        Next {
            chain: &self.chain,
            handler: self.handler,
        }
        .run(ctx)
    }
}

/// Key a middleware type is registered under by [`MiddlewareStack::push`]
#[must_use]
pub fn key_of<M: ?Sized>() -> &'static str {
    std::any::type_name::<M>()
}
