//! Tests for URL reconstruction through path helpers
//!
//! # Test Coverage
//!
//! - Placeholder substitution and escaping
//! - Missing placeholders fail without partial output
//! - Leftover parameters become a query string sorted by key
//! - Joining onto patterns that already carry a query string
//! - Leftovers are chosen by key, never by value
//! - Template integration through minijinja

mod common;

use common::test_app;
use http::StatusCode;
use routekit::{Context, HandlerResult, Params, RouteError};

fn ok(ctx: &mut Context<'_>) -> HandlerResult {
    ctx.render_text(StatusCode::OK, "ok")
}

#[test]
fn test_every_placeholder_is_substituted() {
    let mut app = test_app();
    app.get("/users/{user_id}/posts/{id}", ok).unwrap();

    let helper = app.path_helpers().remove("userPostPath").unwrap();
    let url = helper
        .call(&Params::new().with("user_id", 7).with("id", "intro"))
        .unwrap();
    assert_eq!(url, "/users/7/posts/intro");
}

#[test]
fn test_missing_placeholder_fails() {
    let mut app = test_app();
    let id = app.get("/users/{user_id}/posts/{id}", ok).unwrap().id();
    let helper = app.route(id).unwrap().build_path_helper();

    let err = helper.call(&Params::new().with("id", 1).with("page", 2)).unwrap_err();
    assert!(matches!(err, RouteError::MissingParams { ref missing, .. } if missing == &["user_id"]));
    assert!(err.to_string().starts_with("missing parameters for /users/{user_id}/posts/{id}"));
}

#[test]
fn test_leftovers_are_sorted_by_key() {
    let mut app = test_app();
    app.get("/widgets", ok).unwrap();

    let url = app
        .path_for("widgetsPath", &Params::new().with("b", "2").with("a", "1"))
        .unwrap();
    assert_eq!(url, "/widgets?a=1&b=2");
}

#[test]
fn test_no_leftovers_leave_path_unchanged() {
    let mut app = test_app();
    app.get("/widgets/{id}", ok).unwrap();
    let url = app.path_for("widgetPath", &Params::new().with("id", 3)).unwrap();
    assert_eq!(url, "/widgets/3");
    assert!(!url.contains('?'));
}

#[test]
fn test_existing_query_is_joined_with_ampersand() {
    let mut app = test_app();
    app.get("/x?sort=asc", ok).unwrap().name("sorted").unwrap();
    let url = app
        .path_for("sortedPath", &Params::new().with("page", "2"))
        .unwrap();
    assert_eq!(url, "/x?sort=asc&page=2");
}

#[test]
fn test_trailing_question_mark_gets_no_ampersand() {
    let mut app = test_app();
    app.get("/x?", ok).unwrap().name("bare").unwrap();
    let url = app.path_for("barePath", &Params::new().with("page", 2)).unwrap();
    assert_eq!(url, "/x?page=2");
}

#[test]
fn test_leftover_with_value_present_in_path_is_kept() {
    let mut app = test_app();
    app.get("/widgets/{id}", ok).unwrap();
    let url = app
        .path_for("widgetPath", &Params::new().with("id", 5).with("page", 5))
        .unwrap();
    assert_eq!(url, "/widgets/5?page=5");
}

#[test]
fn test_values_are_escaped() {
    let mut app = test_app();
    app.get("/search/{term}", ok).unwrap();
    let url = app
        .path_for(
            "searchPath",
            &Params::new().with("term", "rust lang").with("q", "a&b=c"),
        )
        .unwrap();
    assert_eq!(url, "/search/rust%20lang?q=a%26b%3Dc");
}

#[test]
fn test_output_is_deterministic() {
    let mut app = test_app();
    app.get("/widgets", ok).unwrap();
    let forward: Params = [("x", "1"), ("y", "2"), ("z", "3")].into_iter().collect();
    let backward: Params = [("z", "3"), ("y", "2"), ("x", "1")].into_iter().collect();
    assert_eq!(
        app.path_for("widgetsPath", &forward).unwrap(),
        app.path_for("widgetsPath", &backward).unwrap()
    );
}

#[test]
fn test_unknown_helper() {
    let app = test_app();
    let err = app.path_for("nopePath", &Params::new()).unwrap_err();
    assert_eq!(
        err,
        RouteError::UnknownRoute {
            name: "nopePath".to_string()
        }
    );
}

#[test]
fn test_helpers_are_usable_from_templates() {
    let mut app = test_app();
    app.get("/widgets/{id}", ok).unwrap();

    let mut env = minijinja::Environment::new();
    app.register_path_helpers(&mut env);
    env.add_template("link.html", r#"<a href="{{ widgetPath(id=5, page=2, draft=true) }}">"#)
        .unwrap();
    let html = env
        .get_template("link.html")
        .unwrap()
        .render(minijinja::context! {})
        .unwrap();
    assert_eq!(html, r#"<a href="/widgets/5?draft=true&page=2">"#);
}

#[test]
fn test_template_reports_missing_params() {
    let mut app = test_app();
    app.get("/widgets/{id}", ok).unwrap();

    let mut env = minijinja::Environment::new();
    app.register_path_helpers(&mut env);
    let err = env.render_str("{{ widgetPath(page=2) }}", minijinja::context! {}).unwrap_err();
    assert!(err.to_string().contains("missing parameters"));
}
