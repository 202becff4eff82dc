use anyhow::{bail, Context as _};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Environment the application runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    /// Parse from a string, defaulting to `Development` for unknown values
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "test" => Environment::Test,
            _ => Environment::Development,
        }
    }

    #[must_use]
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application-wide settings.
///
/// ## Environment Variables
///
/// | Variable | Field | Default |
/// |----------|-------|---------|
/// | `ROUTEKIT_ENV` | `env` | `development` |
/// | `ROUTEKIT_APP_NAME` | `name` | `routekit` |
/// | `ROUTEKIT_SESSION_COOKIE` | `session_cookie` | `_routekit_session` |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    pub env: Environment,
    /// Cookie carrying the session id
    pub session_cookie: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "routekit".to_string(),
            env: Environment::Development,
            session_cookie: "_routekit_session".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from environment variables, falling back to defaults
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Load from a TOML, YAML or JSON file (chosen by extension), then apply
    /// environment variable overrides.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let mut config: Self = load_document(path.as_ref())?;
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(v) = env::var("ROUTEKIT_ENV") {
            self.env = Environment::parse(&v);
        }
        if let Ok(v) = env::var("ROUTEKIT_APP_NAME") {
            if !v.trim().is_empty() {
                self.name = v;
            }
        }
        if let Ok(v) = env::var("ROUTEKIT_SESSION_COOKIE") {
            if !v.trim().is_empty() {
                self.session_cookie = v;
            }
        }
        debug!(
            app_name = %self.name,
            env = %self.env,
            session_cookie = %self.session_cookie,
            "Application config loaded"
        );
    }
}

/// Deserialize a document, picking the format from the file extension.
pub(crate) fn load_document<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "toml" => toml::from_str(&content)
            .with_context(|| format!("failed to parse TOML in {}", path.display())),
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML in {}", path.display())),
        "json" => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON in {}", path.display())),
        other => bail!(
            "unsupported file extension {other:?} for {}, expected toml, yaml or json",
            path.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("PRODUCTION"), Environment::Production);
        assert_eq!(Environment::parse("test"), Environment::Test);
        assert_eq!(Environment::parse("staging"), Environment::Development);
    }

    #[test]
    fn test_from_toml_file_fills_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "name = \"shop\"\nenv = \"test\"").unwrap();
        let config: AppConfig = load_document(file.path()).unwrap();
        assert_eq!(config.name, "shop");
        assert_eq!(config.env, Environment::Test);
        assert_eq!(config.session_cookie, "_routekit_session");
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let err = load_document::<AppConfig>(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported file extension"));
    }
}
