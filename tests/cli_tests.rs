//! End-to-end tests of the `routekit` binary

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

const MANIFEST: &str = r#"
routes:
  - method: GET
    path: /widgets
    handler: widgets::index
  - method: GET
    path: /widgets/{id:[0-9]+}
    handler: widgets::show
    aliases: ["/w/{id:[0-9]+}"]
  - method: post
    path: /widgets
    handler: widgets::create
    name: createWidget
"#;

fn write_manifest(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("routes.yaml");
    fs::write(&path, MANIFEST).unwrap();
    path
}

fn routekit(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_routekit"))
        .args(args)
        .env("ROUTEKIT_LOG_LEVEL", "error")
        .output()
        .expect("run routekit")
}

#[test]
fn test_routes_table() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(&dir);
    let out = routekit(&["routes", "--manifest", manifest.to_str().unwrap()]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.lines().next().unwrap().starts_with("METHOD"));
    assert!(stdout.contains("widgets::show"));
    assert!(stdout.contains("/w/{id:[0-9]+}"));
    assert!(stdout.contains("createWidgetPath"));
}

#[test]
fn test_path_with_leftovers() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(&dir);
    let out = routekit(&[
        "path",
        "--manifest",
        manifest.to_str().unwrap(),
        "widgetPath",
        "id=12",
        "sort=name desc",
        "page=2",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "/widgets/12?page=2&sort=name+desc\n");
}

#[test]
fn test_path_missing_param_fails() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(&dir);
    let out = routekit(&["path", "-m", manifest.to_str().unwrap(), "widgetPath"]);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing parameters for /widgets/{id:[0-9]+}"));
}

#[test]
fn test_path_rejects_constraint_violation() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(&dir);
    let out = routekit(&["path", "-m", manifest.to_str().unwrap(), "widgetPath", "id=abc"]);
    assert!(!out.status.success());
}

#[test]
fn test_missing_manifest_fails() {
    let out = routekit(&["routes", "--manifest", "/definitely/not/here.toml"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to read"));
}
