//! Tests for route registration, aliasing and naming
//!
//! # Test Coverage
//!
//! - Generated helper names and collision handling
//! - `alias` registers extra dispatch paths for the same route, never stealing
//!   another route's pattern
//! - `name` normalization and duplicate detection
//! - Re-registration replaces the handler in place
//! - Descriptor serialization order and pretty `Display`

mod common;

use common::{body, get, test_app};
use http::{Method, StatusCode};
use routekit::{Context, HandlerResult, RouteError};

fn show(ctx: &mut Context<'_>) -> HandlerResult {
    let id = ctx.param("id").unwrap_or_default().to_string();
    ctx.render_text(StatusCode::OK, format!("show {id}"))
}

fn index(ctx: &mut Context<'_>) -> HandlerResult {
    ctx.render_text(StatusCode::OK, "index")
}

#[test]
fn test_generated_names() {
    let mut app = test_app();
    app.get("/", index).unwrap();
    app.get("/widgets", index).unwrap();
    app.get("/widgets/{id}", show).unwrap();
    app.get("/widgets/{id}/edit", show).unwrap();

    let names: Vec<&str> = app.routes().iter().map(|r| r.path_name()).collect();
    assert_eq!(
        names,
        vec!["rootPath", "widgetsPath", "widgetPath", "widgetEditPath"]
    );
}

#[test]
fn test_same_pattern_shares_generated_name() {
    let mut app = test_app();
    app.get("/widgets/{id}", show).unwrap();
    app.put("/widgets/{id}", show).unwrap();
    app.delete("/widgets/{id}", show).unwrap();
    assert!(app.routes().iter().all(|r| r.path_name() == "widgetPath"));
}

#[test]
fn test_generated_name_collision_is_disambiguated() {
    let mut app = test_app();
    app.get("/widgets/{id}", show).unwrap();
    app.get("/widgets/{slug}", show).unwrap();
    app.get("/widget/{id}", show).unwrap();

    assert_eq!(app.routes()[0].path_name(), "widgetPath");
    assert_eq!(app.routes()[1].path_name(), "widgetBySlugPath");
    assert_eq!(app.routes()[2].path_name(), "widgetByIdPath");
}

#[test]
fn test_alias_dispatches_to_same_route() {
    let mut app = test_app();
    let id = app
        .get("/widgets/{id}", show)
        .unwrap()
        .alias(["/foo/:id"])
        .unwrap()
        .id();

    let res = app.handle(get("/foo/5"));
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(&res), "show 5");

    let route = app.route(id).unwrap();
    assert_eq!(route.aliases(), ["/foo/:id"]);
    assert_eq!(route.path(), "/widgets/{id}");
    assert_eq!(route.path_name(), "widgetPath");
}

#[test]
fn test_alias_appends_once_per_call() {
    let mut app = test_app();
    let id = app.get("/a", index).unwrap().id();
    app.route_mut(id).unwrap().alias(["/b", "/c"]).unwrap();
    app.route_mut(id).unwrap().alias(["/b"]).unwrap();
    assert_eq!(app.route(id).unwrap().aliases(), ["/b", "/c", "/b"]);
    assert_eq!(body(&app.handle(get("/c"))), "index");
}

#[test]
fn test_alias_keeps_method() {
    let mut app = test_app();
    app.post("/widgets", index).unwrap().alias(["/gadgets"]).unwrap();
    let res = app.handle(get("/gadgets"));
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[test]
fn test_alias_rejects_malformed_pattern() {
    let mut app = test_app();
    let err = app
        .get("/widgets", index)
        .unwrap()
        .alias(["/gadgets/{id"])
        .unwrap_err();
    assert!(matches!(err, RouteError::InvalidPattern { .. }));
    assert!(app.routes()[0].aliases().is_empty());
}

#[test]
fn test_alias_rejects_pattern_of_another_route() {
    let mut app = test_app();
    let a = app.get("/a", |ctx| ctx.render_text(StatusCode::OK, "A")).unwrap().id();
    let err = app
        .get("/b", |ctx| ctx.render_text(StatusCode::OK, "B"))
        .unwrap()
        .alias(["/a"])
        .unwrap_err();
    assert_eq!(
        err,
        RouteError::PatternConflict {
            method: "GET".to_string(),
            pattern: "/a".to_string(),
            existing: a,
        }
    );
    assert!(app.routes()[1].aliases().is_empty());
    assert_eq!(body(&app.handle(get("/a"))), "A");
}

#[test]
fn test_route_on_alias_of_another_route_fails() {
    let mut app = test_app();
    app.get("/widgets", index).unwrap().alias(["/gadgets"]).unwrap();
    let err = app.get("/gadgets", show).unwrap_err();
    assert!(matches!(err, RouteError::PatternConflict { ref pattern, .. } if pattern == "/gadgets"));
    assert_eq!(app.routes().len(), 1);
    assert_eq!(body(&app.handle(get("/gadgets"))), "index");
}

#[test]
fn test_name_normalization() {
    let mut app = test_app();
    app.get("/widgets/{id}", show).unwrap().name("show").unwrap();
    assert_eq!(app.routes()[0].path_name(), "showPath");

    app.route_mut(app.routes()[0].id())
        .unwrap()
        .name("ShowPath")
        .unwrap();
    assert_eq!(app.routes()[0].path_name(), "showPath");
    assert!(app.route_named("widgetPath").is_none());
}

#[test]
fn test_name_rejects_empty_candidate() {
    let mut app = test_app();
    let err = app.get("/widgets", index).unwrap().name("  ").unwrap_err();
    assert!(matches!(err, RouteError::InvalidName { .. }));
    assert_eq!(app.routes()[0].path_name(), "widgetsPath");
}

#[test]
fn test_name_collision_with_other_path_fails() {
    let mut app = test_app();
    app.get("/widgets", index).unwrap().name("list").unwrap();
    let err = app.get("/gadgets", index).unwrap().name("list").unwrap_err();
    assert_eq!(
        err,
        RouteError::DuplicateName {
            name: "listPath".to_string(),
            existing_path: "/widgets".to_string(),
        }
    );
    assert_eq!(app.routes()[1].path_name(), "gadgetsPath");
}

#[test]
fn test_name_shared_by_same_path_is_allowed() {
    let mut app = test_app();
    app.get("/widgets", index).unwrap().name("list").unwrap();
    app.post("/widgets", index).unwrap().name("list").unwrap();
    assert_eq!(app.routes()[1].path_name(), "listPath");
}

#[test]
fn test_reregistration_replaces_handler() {
    let mut app = test_app();
    app.get("/widgets", index).unwrap().name("list").unwrap();
    app.get("/widgets", |ctx| ctx.render_text(StatusCode::OK, "v2"))
        .unwrap();

    assert_eq!(app.routes().len(), 1);
    assert_eq!(app.routes()[0].path_name(), "listPath");
    assert_eq!(body(&app.handle(get("/widgets"))), "v2");
}

#[test]
fn test_invalid_pattern_is_not_registered() {
    let mut app = test_app();
    assert!(app.get("widgets", index).is_err());
    assert!(app.routes().is_empty());
}

#[test]
fn test_descriptor_snapshot() {
    let mut app = test_app();
    app.add_route(Method::GET, "/widgets/{id}", show)
        .unwrap()
        .alias(["/gadgets/{id}"])
        .unwrap();
    let route = &app.routes()[0];

    let json = serde_json::to_string(route).unwrap();
    assert_eq!(
        json,
        r#"{"method":"GET","path":"/widgets/{id}","handler":"route_registry_tests::show","pathName":"widgetPath","aliases":["/gadgets/{id}"]}"#
    );

    let pretty = route.to_string();
    assert!(pretty.starts_with("{\n  \"method\": \"GET\",\n  \"path\": \"/widgets/{id}\""));
}

#[test]
fn test_routes_table_lists_every_route() {
    let mut app = test_app();
    app.get("/widgets", index).unwrap();
    app.get("/widgets/{id}", show).unwrap().alias(["/w/{id}"]).unwrap();

    let table = app.routes_table();
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("METHOD"));
    assert!(lines[3].contains("/w/{id}"));
    assert!(lines[3].contains("widgetPath"));
}
