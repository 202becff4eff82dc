use super::{Lookup, PathPattern, RouteId, Router};
use crate::error::RouteError;
use crate::params::Params;
use http::Method;

#[test]
fn test_root_path() {
    let p = PathPattern::parse("/").unwrap();
    assert!(p.is_match("/"));
    assert_eq!(p.param_names().count(), 0);
}

#[test]
fn test_brace_placeholder() {
    let p = PathPattern::parse("/items/{id}").unwrap();
    assert!(p.is_match("/items/123"));
    assert!(!p.is_match("/items/123/extra"));
    assert_eq!(p.param_names().collect::<Vec<_>>(), vec!["id"]);
}

#[test]
fn test_colon_placeholder() {
    let p = PathPattern::parse("/foo/:id/bar").unwrap();
    let params = p.captures("/foo/5/bar").unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].0.as_ref(), "id");
    assert_eq!(params[0].1, "5");
}

#[test]
fn test_constrained_placeholder() {
    let p = PathPattern::parse("/items/{id:[0-9]{2,}}").unwrap();
    assert!(p.is_match("/items/42"));
    assert!(!p.is_match("/items/4"));
    assert!(!p.is_match("/items/abc"));
}

#[test]
fn test_mid_segment_placeholders() {
    let p = PathPattern::parse("/files/{name}.{ext}").unwrap();
    let params = p.captures("/files/report.pdf").unwrap();
    assert_eq!(params[0].1, "report");
    assert_eq!(params[1].1, "pdf");
}

#[test]
fn test_captures_are_decoded() {
    let p = PathPattern::parse("/q/{term}").unwrap();
    let params = p.captures("/q/hello%20world").unwrap();
    assert_eq!(params[0].1, "hello world");
}

#[test]
fn test_invalid_patterns() {
    for raw in ["widgets", "/a/{id", "/a/id}", "/a/{}", "/a/{id:}", "/a/:", "/a/{id:[}"] {
        let err = PathPattern::parse(raw).unwrap_err();
        assert!(
            matches!(err, RouteError::InvalidPattern { .. }),
            "{raw} should be rejected, got {err:?}"
        );
    }
}

#[test]
fn test_render_reports_consumed_keys() {
    let p = PathPattern::parse("/users/{user_id}/posts/{id}").unwrap();
    let params = Params::new()
        .with("user_id", 7)
        .with("id", 99)
        .with("page", 2);
    let rendered = p.render(&params).unwrap();
    assert_eq!(rendered.path, "/users/7/posts/99");
    assert_eq!(rendered.consumed, vec!["user_id", "id"]);
}

#[test]
fn test_render_missing_lists_every_placeholder() {
    let p = PathPattern::parse("/users/{user_id}/posts/{id}").unwrap();
    let err = p.render(&Params::new().with("id", 1)).unwrap_err();
    assert_eq!(
        err,
        RouteError::MissingParams {
            path: "/users/{user_id}/posts/{id}".to_string(),
            missing: vec!["user_id".to_string()],
        }
    );
}

#[test]
fn test_render_rejects_constraint_violation() {
    let p = PathPattern::parse("/items/{id:[0-9]+}").unwrap();
    let err = p.render(&Params::new().with("id", "abc")).unwrap_err();
    assert!(matches!(err, RouteError::InvalidParam { ref param, .. } if param == "id"));
}

#[test]
fn test_render_encodes_values() {
    let p = PathPattern::parse("/q/{term}").unwrap();
    let rendered = p.render(&Params::new().with("term", "a b")).unwrap();
    assert_eq!(rendered.path, "/q/a%20b");
}

#[test]
fn test_router_first_registration_wins() {
    let mut router = Router::new();
    router
        .register(Method::GET, "/widgets/new", RouteId::new(0))
        .unwrap();
    router
        .register(Method::GET, "/widgets/{id}", RouteId::new(1))
        .unwrap();

    match router.route(&Method::GET, "/widgets/new") {
        Lookup::Matched { target, .. } => assert_eq!(target, RouteId::new(0)),
        other => panic!("unexpected lookup {other:?}"),
    }
    match router.route(&Method::GET, "/widgets/9") {
        Lookup::Matched { target, params } => {
            assert_eq!(target, RouteId::new(1));
            assert_eq!(params[0].1, "9");
        }
        other => panic!("unexpected lookup {other:?}"),
    }
}

#[test]
fn test_router_method_not_allowed() {
    let mut router = Router::new();
    router
        .register(Method::GET, "/widgets", RouteId::new(0))
        .unwrap();
    router
        .register(Method::POST, "/widgets", RouteId::new(1))
        .unwrap();

    assert_eq!(
        router.route(&Method::DELETE, "/widgets"),
        Lookup::MethodNotAllowed {
            allowed: vec![Method::GET, Method::POST]
        }
    );
    assert_eq!(router.route(&Method::GET, "/gadgets"), Lookup::NotFound);
}

#[test]
fn test_router_duplicate_registration_is_noop() {
    let mut router = Router::new();
    router.register(Method::GET, "/a", RouteId::new(0)).unwrap();
    router.register(Method::GET, "/a", RouteId::new(0)).unwrap();
    assert_eq!(router.len(), 1);
}

#[test]
fn test_router_rejects_pattern_owned_by_other_target() {
    let mut router = Router::new();
    router.register(Method::GET, "/a", RouteId::new(0)).unwrap();
    let err = router
        .register(Method::GET, "/a", RouteId::new(3))
        .unwrap_err();
    assert_eq!(
        err,
        RouteError::PatternConflict {
            method: "GET".to_string(),
            pattern: "/a".to_string(),
            existing: RouteId::new(0),
        }
    );
    assert_eq!(router.len(), 1);
    router.register(Method::POST, "/a", RouteId::new(3)).unwrap();
    assert_eq!(router.len(), 2);
}
