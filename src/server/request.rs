use crate::router::ParamVec;
use http::header::COOKIE;
use http::HeaderMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Inbound request type consumed by services and handlers.
pub type Request = http::Request<Vec<u8>>;

/// Parse the `Cookie` header(s) into a name → value map.
///
/// Later occurrences of the same cookie name win.
#[must_use]
pub fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    let cookies: HashMap<String, String> = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|c| c.split(';'))
        .filter_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let name = parts.next()?.trim();
            if name.is_empty() {
                return None;
            }
            let value = parts.next().unwrap_or("").trim();
            Some((name.to_string(), value.to_string()))
        })
        .collect();

    debug!(
        cookie_count = cookies.len(),
        cookie_names = ?cookies.keys().collect::<Vec<_>>(),
        "Cookies extracted"
    );
    cookies
}

/// Parse a raw query string (the part after `?`) into ordered pairs.
///
/// Names and values are `application/x-www-form-urlencoded` decoded; repeated
/// names are kept in order.
#[must_use]
pub fn parse_query_params(query: Option<&str>) -> ParamVec {
    let Some(query) = query else {
        return ParamVec::new();
    };
    let params: ParamVec = url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (Arc::from(k.as_ref()), v.into_owned()))
        .collect();

    debug!(
        param_count = params.len(),
        query_params = ?params,
        "Query params parsed"
    );
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_parse_cookies() {
        let mut h = HeaderMap::new();
        h.insert(COOKIE, HeaderValue::from_static("a=b; c=d"));
        let cookies = parse_cookies(&h);
        assert_eq!(cookies.get("a"), Some(&"b".to_string()));
        assert_eq!(cookies.get("c"), Some(&"d".to_string()));
    }

    #[test]
    fn test_parse_cookies_across_headers() {
        let mut h = HeaderMap::new();
        h.append(COOKIE, HeaderValue::from_static("a=1"));
        h.append(COOKIE, HeaderValue::from_static("b=2; a=3"));
        let cookies = parse_cookies(&h);
        assert_eq!(cookies.get("a"), Some(&"3".to_string()));
        assert_eq!(cookies.get("b"), Some(&"2".to_string()));
    }

    #[test]
    fn test_parse_query_params() {
        let q = parse_query_params(Some("x=1&y=hello+world&x=2"));
        assert_eq!(q.len(), 3);
        assert_eq!(q[1].1, "hello world");
        assert_eq!(q[2].0.as_ref(), "x");
    }

    #[test]
    fn test_parse_missing_query() {
        assert!(parse_query_params(None).is_empty());
    }
}
