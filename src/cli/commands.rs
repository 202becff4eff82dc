use crate::config::{AppConfig, RouteManifest};
use crate::params::Params;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// Command-line interface for routekit
#[derive(Parser, Debug)]
#[command(name = "routekit", version)]
#[command(about = "Inspect route manifests and build paths from them", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the route table declared by a manifest
    Routes {
        /// Route manifest (TOML, YAML or JSON)
        #[arg(short, long, env = "ROUTEKIT_MANIFEST")]
        manifest: PathBuf,

        /// Print each route as its JSON descriptor instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Build a URL with a named path helper
    Path {
        /// Route manifest (TOML, YAML or JSON)
        #[arg(short, long, env = "ROUTEKIT_MANIFEST")]
        manifest: PathBuf,

        /// Path helper name, e.g. `widgetPath`
        name: String,

        /// Parameters as `key=value`
        #[arg(value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid parameter {s:?}, expected key=value"))?;
    if key.is_empty() {
        return Err(format!("invalid parameter {s:?}, empty key"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Execute `cli`, writing results to `out`.
///
/// # Errors
///
/// Fails when the manifest cannot be loaded or the path cannot be built.
pub fn run_cli(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    match cli.command {
        Commands::Routes { manifest, json } => {
            let app = RouteManifest::from_file(&manifest)?.build_app(AppConfig::from_env())?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(app.routes())?)?;
            } else {
                write!(out, "{}", app.routes_table())?;
            }
        }
        Commands::Path {
            manifest,
            name,
            params,
        } => {
            let app = RouteManifest::from_file(&manifest)?.build_app(AppConfig::from_env())?;
            let params: Params = params.into_iter().collect();
            let url = app.path_for(&name, &params)?;
            writeln!(out, "{url}")?;
        }
    }
    Ok(())
}
