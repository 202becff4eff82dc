use crate::error::RouteError;
use crate::params::Params;
use regex::Regex;
use std::sync::Arc;

use super::ParamVec;

/// Constraint applied to placeholders declared without one
const DEFAULT_CONSTRAINT: &str = "[^/]+";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Param {
        name: String,
        constraint: Option<String>,
    },
}

/// A compiled path pattern.
///
/// Holds the regex used to match request paths plus, for rendering, one anchored
/// validator per placeholder.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    tokens: Vec<Token>,
    matcher: Regex,
    /// Capture group name for each placeholder, in pattern order
    groups: Vec<String>,
    /// Anchored constraint for each placeholder, in pattern order
    validators: Vec<Regex>,
    param_names: Vec<Arc<str>>,
}

/// Output of [`PathPattern::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPath {
    /// The concrete path with every placeholder substituted
    pub path: String,
    /// Names of the parameters the pattern consumed, in pattern order, without duplicates
    pub consumed: Vec<String>,
}

fn invalid(pattern: &str, reason: impl Into<String>) -> RouteError {
    RouteError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.into(),
    }
}

fn valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl PathPattern {
    /// Compile a path pattern.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPattern`] when the pattern does not start with `/`,
    /// has unbalanced braces, declares an empty or non-identifier placeholder name,
    /// or carries a constraint that is not a valid regex.
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        if !raw.starts_with('/') {
            return Err(invalid(raw, "must start with '/'"));
        }

        let tokens = tokenize(raw)?;

        let mut pattern = String::with_capacity(raw.len() + 16);
        pattern.push('^');
        let mut groups = Vec::new();
        let mut validators = Vec::new();
        let mut param_names = Vec::new();

        for token in &tokens {
            match token {
                Token::Literal(text) => pattern.push_str(&regex::escape(text)),
                Token::Param { name, constraint } => {
                    let constraint = constraint.as_deref().unwrap_or(DEFAULT_CONSTRAINT);
                    let group = format!("p{}", groups.len());
                    pattern.push_str(&format!("(?P<{group}>{constraint})"));
                    let validator = Regex::new(&format!("^(?:{constraint})$"))
                        .map_err(|e| invalid(raw, e.to_string()))?;
                    groups.push(group);
                    validators.push(validator);
                    param_names.push(Arc::from(name.as_str()));
                }
            }
        }
        pattern.push('$');

        let matcher = Regex::new(&pattern).map_err(|e| invalid(raw, e.to_string()))?;

        Ok(Self {
            raw: raw.to_string(),
            tokens,
            matcher,
            groups,
            validators,
            param_names,
        })
    }

    /// The pattern as registered
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in pattern order (a name may repeat)
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.param_names.iter().map(AsRef::as_ref)
    }

    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }

    /// Match `path` and extract percent-decoded placeholder values.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<ParamVec> {
        let caps = self.matcher.captures(path)?;
        let mut params = ParamVec::new();
        for (group, name) in self.groups.iter().zip(&self.param_names) {
            if let Some(m) = caps.name(group) {
                let value = urlencoding::decode(m.as_str())
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| m.as_str().to_string());
                params.push((Arc::clone(name), value));
            }
        }
        Some(params)
    }

    /// Substitute `params` into the pattern.
    ///
    /// Every placeholder must have a value in `params`; nothing is rendered
    /// otherwise. Values are checked against their placeholder's constraint and
    /// percent-encoded. The result reports which keys were consumed.
    ///
    /// # Errors
    ///
    /// - [`RouteError::MissingParams`] if any placeholder has no value
    /// - [`RouteError::InvalidParam`] if a value violates its placeholder's constraint
    pub fn render(&self, params: &Params) -> Result<RenderedPath, RouteError> {
        let mut missing: Vec<String> = Vec::new();
        for name in self.param_names() {
            if !params.contains_key(name) && !missing.iter().any(|m| m == name) {
                missing.push(name.to_string());
            }
        }
        if !missing.is_empty() {
            return Err(RouteError::MissingParams {
                path: self.raw.clone(),
                missing,
            });
        }

        let mut path = String::with_capacity(self.raw.len());
        let mut consumed: Vec<String> = Vec::with_capacity(self.param_names.len());
        let mut validators = self.validators.iter();

        for token in &self.tokens {
            match token {
                Token::Literal(text) => path.push_str(text),
                Token::Param { name, .. } => {
                    let value = params
                        .get(name)
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    let accepted = validators
                        .next()
                        .map(|v| v.is_match(&value))
                        .unwrap_or(false);
                    if !accepted {
                        return Err(RouteError::InvalidParam {
                            path: self.raw.clone(),
                            param: name.clone(),
                            value,
                        });
                    }
                    path.push_str(&urlencoding::encode(&value));
                    if !consumed.iter().any(|c| c == name) {
                        consumed.push(name.clone());
                    }
                }
            }
        }

        Ok(RenderedPath { path, consumed })
    }
}

impl PartialEq for PathPattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for PathPattern {}

/// Placeholder names declared by one path segment, in order.
///
/// Malformed segments declare none.
pub(crate) fn segment_params(segment: &str) -> Vec<String> {
    tokenize(&format!("/{segment}"))
        .map(|tokens| {
            tokens
                .into_iter()
                .filter_map(|t| match t {
                    Token::Param { name, .. } => Some(name),
                    Token::Literal(_) => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

fn tokenize(raw: &str) -> Result<Vec<Token>, RouteError> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = raw.chars().peekable();
    let mut prev: Option<char> = None;

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                let mut depth = 1;
                let mut body = String::new();
                for inner in chars.by_ref() {
                    match inner {
                        '{' => depth += 1,
                        '}' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                    body.push(inner);
                }
                if depth != 0 {
                    return Err(invalid(raw, "unbalanced '{'"));
                }
                let (name, constraint) = match body.split_once(':') {
                    Some((name, constraint)) => (name.trim(), Some(constraint.trim())),
                    None => (body.trim(), None),
                };
                if !valid_name(name) {
                    return Err(invalid(raw, format!("invalid parameter name '{name}'")));
                }
                if constraint == Some("") {
                    return Err(invalid(raw, format!("empty constraint for '{name}'")));
                }
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Param {
                    name: name.to_string(),
                    constraint: constraint.map(str::to_string),
                });
                prev = Some('}');
            }
            '}' => return Err(invalid(raw, "unbalanced '}'")),
            ':' if prev == Some('/') => {
                let mut name = String::new();
                while let Some(&next) = chars.peek() {
                    if next == '/' {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }
                if !valid_name(&name) {
                    return Err(invalid(raw, format!("invalid parameter name '{name}'")));
                }
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Param {
                    name,
                    constraint: None,
                });
                prev = None;
            }
            _ => {
                literal.push(c);
                prev = Some(c);
            }
        }
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}
