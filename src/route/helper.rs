use crate::error::RouteError;
use crate::params::Params;
use crate::router::PathPattern;
use serde::Serialize;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use url::form_urlencoded::byte_serialize;

/// A URL built by a [`PathHelper`].
///
/// Every dynamic part has been escaped, so templates may emit it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SafeUrl(String);

impl SafeUrl {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SafeUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for SafeUrl {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SafeUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SafeUrl {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SafeUrl {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<SafeUrl> for String {
    fn from(url: SafeUrl) -> Self {
        url.0
    }
}

impl From<SafeUrl> for minijinja::Value {
    fn from(url: SafeUrl) -> Self {
        minijinja::Value::from_safe_string(url.0)
    }
}

/// Builds concrete URLs for one route from a parameter bag.
///
/// Parameters named by the route's placeholders fill the path; every other
/// parameter is appended as a query string, sorted by key. Helpers are cheap to
/// clone and independent of the application that produced them.
#[derive(Debug, Clone)]
pub struct PathHelper {
    name: String,
    pattern: Arc<PathPattern>,
}

impl PathHelper {
    pub(crate) fn new(name: impl Into<String>, pattern: Arc<PathPattern>) -> Self {
        Self {
            name: name.into(),
            pattern,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Build the URL for `params`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::MissingParams`] when a placeholder has no value and
    /// [`RouteError::InvalidParam`] when a value violates its placeholder's constraint.
    pub fn call(&self, params: &Params) -> Result<SafeUrl, RouteError> {
        let rendered = self.pattern.render(params)?;
        let leftovers: Vec<(&str, String)> = params
            .iter()
            .filter(|(key, _)| !rendered.consumed.iter().any(|c| c == key))
            .map(|(key, value)| (key, value.to_string()))
            .collect();
        Ok(SafeUrl(append_query(rendered.path, &leftovers)))
    }
}

/// Append `leftovers` to `path` as an `application/x-www-form-urlencoded` query.
///
/// Pairs are sorted by key (stable for repeated keys). A `?` is added when `path`
/// has none, and `&` when it already carries a query that does not end in `?`.
/// With no leftovers `path` is returned unchanged.
#[must_use]
pub fn append_query<K, V>(path: impl Into<String>, leftovers: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = path.into();
    if leftovers.is_empty() {
        return url;
    }

    let mut pairs: Vec<(&str, &str)> = leftovers
        .iter()
        .map(|(k, v)| (k.as_ref(), v.as_ref()))
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    if !url.contains('?') {
        url.push('?');
    } else if !url.ends_with('?') {
        url.push('&');
    }
    for (i, (key, value)) in pairs.into_iter().enumerate() {
        if i > 0 {
            url.push('&');
        }
        url.extend(byte_serialize(key.as_bytes()));
        url.push('=');
        url.extend(byte_serialize(value.as_bytes()));
    }
    url
}
