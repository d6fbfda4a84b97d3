//! Configuration management for chatmark.
//!
//! Parses `chatmark.toml` with serde and provides auto-discovery of the config
//! file in the current directory and its parents.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `render.base_origin`
//!
//! ## Example
//!
//! ```toml
//! [render]
//! base_origin = "${CHAT_ORIGIN:-https://chat.example.com}"
//! ```

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the base origin for relative links.
    pub base_origin: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "chatmark.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering configuration.
    pub render: RenderConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Origin relative link targets are resolved against. Any path, query or
    /// fragment is ignored by the renderer.
    pub base_origin: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            base_origin: "http://localhost".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`render.base_origin`").
        field: String,
        /// Error message (e.g., "${`CHAT_ORIGIN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Parse a URL field and require the http:// or https:// scheme.
fn require_http_url(value: &str, field: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::Validation(format!("{field} is not a valid URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(url)
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `chatmark.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading and take precedence over file
    /// values; the result is validated again afterwards.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails, or
    /// the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(base_origin) = &settings.base_origin {
            self.render.base_origin.clone_from(base_origin);
        }
    }

    /// Parsed base origin for link resolution.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `render.base_origin` is empty, not a
    /// URL, or not http(s).
    pub fn base_origin(&self) -> Result<Url, ConfigError> {
        require_non_empty(&self.render.base_origin, "render.base_origin")?;
        require_http_url(&self.render.base_origin, "render.base_origin")
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`Config::load`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_origin()?;
        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.render.base_origin =
            expand::expand_env(&self.render.base_origin, "render.base_origin")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.render.base_origin, "http://localhost");
        assert!(config.config_path.is_none());
        assert_eq!(config.base_origin().unwrap().as_str(), "http://localhost/");
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.render.base_origin, "http://localhost");
    }

    #[test]
    fn test_parse_render_config() {
        let toml = r#"
[render]
base_origin = "https://chat.example.com"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.render.base_origin, "https://chat.example.com");
    }

    #[test]
    fn test_parse_unknown_type_fails() {
        let toml = r"
[render]
base_origin = 42
";
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_apply_cli_settings_base_origin() {
        let mut config = Config::default();
        let overrides = CliSettings {
            base_origin: Some("https://override.example".to_owned()),
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.render.base_origin, "https://override.example");
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.render.base_origin, "http://localhost");
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_base_origin_empty() {
        let mut config = Config::default();
        config.render.base_origin = String::new();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("render.base_origin cannot be empty"));
    }

    #[test]
    fn test_validate_base_origin_not_a_url() {
        let mut config = Config::default();
        config.render.base_origin = "chat.example.com".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("not a valid URL"));
    }

    #[test]
    fn test_validate_base_origin_invalid_scheme() {
        let mut config = Config::default();
        config.render.base_origin = "ftp://chat.example.com".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http:// or https://"));
    }

    #[test]
    fn test_base_origin_https() {
        let mut config = Config::default();
        config.render.base_origin = "https://chat.example.com:8443".to_owned();
        assert_eq!(
            config.base_origin().unwrap().as_str(),
            "https://chat.example.com:8443/"
        );
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[render]\nbase_origin = \"https://file.example\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.render.base_origin, "https://file.example");
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_cli_settings_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[render]\nbase_origin = \"https://file.example\"\n").unwrap();
        let settings = CliSettings {
            base_origin: Some("https://cli.example".to_owned()),
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.render.base_origin, "https://cli.example");
    }

    #[test]
    fn test_load_invalid_cli_override_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();
        let settings = CliSettings {
            base_origin: Some("javascript:alert(1)".to_owned()),
        };

        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[render\n").unwrap();
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_expands_env_vars() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("CHATMARK_TEST_LOAD_ORIGIN", "https://env.example");
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[render]\nbase_origin = \"${CHATMARK_TEST_LOAD_ORIGIN}\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.render.base_origin, "https://env.example");
        unsafe {
            std::env::remove_var("CHATMARK_TEST_LOAD_ORIGIN");
        }
    }

    #[test]
    fn test_load_missing_env_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("CHATMARK_TEST_LOAD_MISSING");
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[render]\nbase_origin = \"${CHATMARK_TEST_LOAD_MISSING}\"\n",
        )
        .unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
    }
}
