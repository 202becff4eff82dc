//! Path helper names: normalizing user-supplied names and deriving default ones.

use crate::error::RouteError;
use crate::router::segment_params;

/// Suffix every path helper name carries
pub const PATH_SUFFIX: &str = "Path";

/// Name given to the helper of `/`
pub const ROOT_NAME: &str = "rootPath";

/// Join the alphanumeric words of `s` in lower camel case.
///
/// `"new_widget"`, `"New Widget"` and `"new-widget"` all give `"newWidget"`.
#[must_use]
pub fn camelize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let words = s
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty());
    for (i, word) in words.enumerate() {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Normalize a requested helper name: camelize it and append [`PATH_SUFFIX`] unless present.
///
/// # Errors
///
/// Returns [`RouteError::InvalidName`] when nothing usable is left after camelizing.
pub fn normalize_name(candidate: &str) -> Result<String, RouteError> {
    let mut name = camelize(candidate);
    if name.is_empty() {
        return Err(RouteError::InvalidName {
            name: candidate.to_string(),
        });
    }
    if !name.ends_with(PATH_SUFFIX) {
        name.push_str(PATH_SUFFIX);
    }
    Ok(name)
}

fn is_placeholder(segment: &str) -> bool {
    segment.contains('{') || segment.starts_with(':')
}

/// Naive English singular, enough for resource collection names.
#[must_use]
pub fn singularize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if lower.len() > 3 && lower.ends_with("ies") {
        format!("{}y", &word[..word.len() - 3])
    } else if lower.ends_with("sses") || lower.ends_with("xes") || lower.ends_with("ches") || lower.ends_with("shes") {
        word[..word.len() - 2].to_string()
    } else if lower.len() > 1 && lower.ends_with('s') && !lower.ends_with("ss") {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Derive the default helper name for a path pattern.
///
/// Static segments are joined in camel case; a segment followed by a placeholder
/// is singularized, so `/widgets/{id}/edit` gives `widgetEditPath`. With
/// `with_params`, placeholders contribute `By<Name>` as well
/// (`widgetByIdEditPath`), used to tell apart patterns that collide otherwise.
#[must_use]
pub fn generate_name(path: &str, with_params: bool) -> String {
    let segments: Vec<&str> = path
        .split(['/', '?'])
        .filter(|s| !s.is_empty())
        .collect();

    let mut words: Vec<String> = Vec::new();
    for (i, segment) in segments.iter().enumerate() {
        if is_placeholder(segment) {
            if with_params {
                let names = segment_params(segment);
                if !names.is_empty() {
                    words.push("by".to_string());
                    words.push(names.join("_and_"));
                }
            }
            continue;
        }
        let before_param = segments.get(i + 1).is_some_and(|next| is_placeholder(next));
        if before_param {
            words.push(singularize(segment));
        } else {
            words.push((*segment).to_string());
        }
    }

    let mut name = camelize(&words.join("_"));
    if name.is_empty() {
        return ROOT_NAME.to_string();
    }
    if !name.ends_with(PATH_SUFFIX) {
        name.push_str(PATH_SUFFIX);
    }
    name
}
