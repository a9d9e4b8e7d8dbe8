//! Configuration file handling.
//!
//! Reads from `~/.config/carform/carform.toml`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the backend base URL.
pub const BASE_URL_ENV: &str = "CARS_API_BASE_URL";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the cars backend, e.g. `http://localhost:5000/api`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Timeout for a single backend request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from the config file.
    ///
    /// If `custom_path` is provided, load from that path.
    /// Otherwise, load from the default XDG config location.
    /// Creates a default config file if it doesn't exist (only for default path).
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self> {
        match custom_path {
            Some(path) => Self::load_from(&path, false),
            None => Self::load_from(&Self::config_path()?, true),
        }
    }

    fn load_from(config_path: &Path, create_missing: bool) -> Result<Self> {
        if !config_path.exists() {
            if create_missing {
                let config = Config::default();
                config.save_to(config_path)?;
                tracing::info!("Created default config: {:?}", config);
                return Ok(config);
            }
            anyhow::bail!("Config file not found: {}", config_path.display());
        }

        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        tracing::info!("Loaded config from {}: {:?}", config_path.display(), config);
        Ok(config)
    }

    /// Save configuration to `config_path`.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))
    }

    /// Pick the backend base URL: CLI flag, then environment, then config file.
    pub fn resolve_base_url(&self, cli: Option<String>, env: Option<String>) -> Result<String> {
        cli.or(env)
            .or_else(|| self.base_url.clone())
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .with_context(|| {
                format!("No backend base URL configured; set {BASE_URL_ENV} or pass --base-url")
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get the path to the config file.
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("carform").join("carform.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_default_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("carform.toml");

        let config = Config::load_from(&path, true).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn missing_custom_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(Config::load(Some(path.clone())).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn reads_values_and_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carform.toml");
        std::fs::write(&path, "base_url = \"http://cars.local/api\"\n").unwrap();

        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://cars.local/api"));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carform.toml");
        std::fs::write(&path, "request_timeout_secs = \"soon\"").unwrap();

        assert!(Config::load(Some(path)).is_err());
    }

    #[test]
    fn base_url_precedence() {
        let config = Config {
            base_url: Some("http://file".to_string()),
            ..Config::default()
        };

        assert_eq!(
            config
                .resolve_base_url(Some("http://cli".into()), Some("http://env".into()))
                .unwrap(),
            "http://cli"
        );
        assert_eq!(
            config.resolve_base_url(None, Some("http://env".into())).unwrap(),
            "http://env"
        );
        assert_eq!(config.resolve_base_url(None, None).unwrap(), "http://file");
        assert!(Config::default().resolve_base_url(None, None).is_err());
        assert!(Config::default()
            .resolve_base_url(None, Some("  ".into()))
            .is_err());
    }
}
