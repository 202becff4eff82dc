//! Unit tests for CLI commands

use super::commands::{run_cli, Cli, Commands};
use clap::Parser;
use std::io::Write;

const MANIFEST: &str = r#"
[[routes]]
method = "GET"
path = "/widgets/{id}"
handler = "widgets::show"
aliases = ["/gadgets/{id}"]

[[routes]]
method = "GET"
path = "/widgets"
handler = "widgets::index"
name = "allWidgets"
"#;

fn manifest_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(MANIFEST.as_bytes()).unwrap();
    file
}

#[test]
fn test_path_command_parses_params() {
    let cli = Cli::try_parse_from(["routekit", "path", "-m", "r.toml", "widgetPath", "id=5", "q=a=b"]).unwrap();
    match cli.command {
        Commands::Path { name, params, .. } => {
            assert_eq!(name, "widgetPath");
            assert_eq!(
                params,
                vec![
                    ("id".to_string(), "5".to_string()),
                    ("q".to_string(), "a=b".to_string())
                ]
            );
        }
        other => panic!("Expected Path command, got {other:?}"),
    }
}

#[test]
fn test_path_command_rejects_bare_word() {
    assert!(Cli::try_parse_from(["routekit", "path", "-m", "r.toml", "widgetPath", "id"]).is_err());
}

#[test]
fn test_run_path() {
    let file = manifest_file();
    let path = file.path().to_str().unwrap();
    let cli = Cli::try_parse_from(["routekit", "path", "-m", path, "widgetPath", "id=5", "page=2"]).unwrap();
    let mut out = Vec::new();
    run_cli(cli, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "/widgets/5?page=2\n");
}

#[test]
fn test_run_routes_json() {
    let file = manifest_file();
    let path = file.path().to_str().unwrap();
    let cli = Cli::try_parse_from(["routekit", "routes", "-m", path, "--json"]).unwrap();
    let mut out = Vec::new();
    run_cli(cli, &mut out).unwrap();
    let routes: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(routes[0]["pathName"], "widgetPath");
    assert_eq!(routes[0]["aliases"][0], "/gadgets/{id}");
    assert_eq!(routes[1]["pathName"], "allWidgetsPath");
}
