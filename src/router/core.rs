//! Router core module - request path matching and target registration.

use crate::error::RouteError;
use http::Method;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::pattern::PathPattern;

/// Maximum number of path parameters before heap allocation.
/// Most routes have ≤4 placeholders (e.g. /users/{id}/posts/{postId}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for matched requests.
///
/// Param names use `Arc<str>` because they come from the compiled pattern and are
/// shared by every match; values are per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Stable identity of a registered route inside its application's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(usize);

impl RouteId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of looking up a request in the [`Router`]
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// A pattern registered for this method matched
    Matched {
        target: RouteId,
        /// Placeholder values extracted from the path, percent-decoded
        params: ParamVec,
    },
    /// The path matched, but only under other methods
    MethodNotAllowed { allowed: Vec<Method> },
    NotFound,
}

#[derive(Debug, Clone)]
struct Entry {
    method: Method,
    pattern: Arc<PathPattern>,
    target: RouteId,
}

/// Matcher mapping `(method, path pattern)` pairs to route targets.
///
/// Entries are tested in registration order; the first entry whose method and
/// pattern both match wins.
#[derive(Debug, Clone, Default)]
pub struct Router {
    entries: Vec<Entry>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `pattern` under `method`, dispatching to `target`.
    ///
    /// Registering an already-known `(method, pattern)` pair for the same target
    /// is a no-op that returns the existing compiled pattern.
    ///
    /// # Errors
    ///
    /// - [`RouteError::InvalidPattern`] if the pattern does not compile
    /// - [`RouteError::PatternConflict`] if the pair already dispatches to another target
    pub fn register(
        &mut self,
        method: Method,
        pattern: &str,
        target: RouteId,
    ) -> Result<Arc<PathPattern>, RouteError> {
        if let Some(existing) = self
            .entries
            .iter()
            .find(|e| e.method == method && e.pattern.as_str() == pattern)
        {
            if existing.target != target {
                warn!(
                    method = %method,
                    pattern = %pattern,
                    existing_target = %existing.target,
                    rejected_target = %target,
                    "Pattern already routed to another target"
                );
                return Err(RouteError::PatternConflict {
                    method: method.to_string(),
                    pattern: pattern.to_string(),
                    existing: existing.target,
                });
            }
            return Ok(Arc::clone(&existing.pattern));
        }

        let compiled = Arc::new(PathPattern::parse(pattern)?);
        self.entries.push(Entry {
            method: method.clone(),
            pattern: Arc::clone(&compiled),
            target,
        });

        info!(
            method = %method,
            pattern = %pattern,
            target = %target,
            total_entries = self.entries.len(),
            "Pattern registered"
        );

        Ok(compiled)
    }

    /// Match a request path (without query string) for `method`.
    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> Lookup {
        let match_start = Instant::now();
        let mut allowed: Vec<Method> = Vec::new();

        for entry in &self.entries {
            let Some(params) = entry.pattern.captures(path) else {
                continue;
            };
            if entry.method == *method {
                let match_duration = match_start.elapsed();
                if match_duration > Duration::from_millis(1) {
                    warn!(
                        method = %method,
                        path = %path,
                        route_pattern = %entry.pattern.as_str(),
                        duration_us = match_duration.as_micros(),
                        "Slow route matching detected"
                    );
                } else {
                    debug!(
                        method = %method,
                        path = %path,
                        route_pattern = %entry.pattern.as_str(),
                        path_params = ?params,
                        duration_us = match_duration.as_micros(),
                        "Route matched"
                    );
                }
                return Lookup::Matched {
                    target: entry.target,
                    params,
                };
            }
            if !allowed.contains(&entry.method) {
                allowed.push(entry.method.clone());
            }
        }

        if allowed.is_empty() {
            debug!(method = %method, path = %path, "No route matched");
            Lookup::NotFound
        } else {
            debug!(
                method = %method,
                path = %path,
                allowed = ?allowed,
                "Path matched under other methods"
            );
            Lookup::MethodNotAllowed { allowed }
        }
    }

    /// Number of registered `(method, pattern)` entries, aliases included
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All registered entries as `(method, pattern, target)`, in registration order
    pub fn entries(&self) -> impl Iterator<Item = (&Method, &str, RouteId)> {
        self.entries
            .iter()
            .map(|e| (&e.method, e.pattern.as_str(), e.target))
    }
}
