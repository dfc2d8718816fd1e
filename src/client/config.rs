//! Client configuration
//!
//! Wraps the installation settings ([`AppConfig`]) together with the sync
//! tunables ([`SyncConfig`]). Settings come from a TOML file, from the
//! environment, or both; environment values win.
//!
//! ```toml
//! [installation]
//! url = "https://notes.example.com"
//! api_token = "..."
//! archived_retention_days = 30
//!
//! [sync]
//! sync_interval_seconds = 120
//! clear_policy = "clear_on_sync_attempt"
//! ```

use crate::client::error::{ClientError, Result};
use crate::client::sync::SyncConfig;
use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Base URL of the article server
pub const URL_ENV: &str = "NOTEBRAIN_URL";
/// Bearer token for the article server
pub const TOKEN_ENV: &str = "NOTEBRAIN_API_TOKEN";
/// Explicit path to the TOML config file
pub const CONFIG_PATH_ENV: &str = "NOTEBRAIN_CONFIG";

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    installation: InstallationSection,
    #[serde(default)]
    sync: SyncConfig,
}

#[derive(Debug, Default, Deserialize)]
struct InstallationSection {
    url: Option<String>,
    api_token: Option<String>,
    archived_retention_days: Option<u32>,
}

/// Application configuration wrapper.
#[derive(Debug, Clone, Default)]
pub struct Config {
    app: AppConfig,
    sync: SyncConfig,
}

impl Config {
    /// Create a configuration from installation settings and default sync tunables
    pub fn new(app: AppConfig) -> Self {
        Self {
            app,
            sync: SyncConfig::default(),
        }
    }

    pub fn with_builder(builder: AppConfigBuilder) -> std::result::Result<Self, ConfigError> {
        Ok(Self::new(builder.build()?))
    }

    pub fn with_sync(mut self, sync: SyncConfig) -> Self {
        self.sync = sync;
        self
    }

    /// Configuration from environment variables only
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        Self::from_file_and_env(ConfigFile::default())
    }

    /// Parse a TOML document, then apply environment overrides
    pub fn from_toml_str(raw: &str) -> std::result::Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(raw)?;
        Self::from_file_and_env(file)
    }

    /// Load a TOML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&raw)
    }

    /// Load from `NOTEBRAIN_CONFIG`, else the default path when present, else env only
    pub fn load_default() -> std::result::Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Self::from_env(),
        }
    }

    /// Platform config location, e.g. `~/.config/notebrain/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("notebrain").join("config.toml"))
    }

    fn from_file_and_env(file: ConfigFile) -> std::result::Result<Self, ConfigError> {
        let mut builder = AppConfig::builder();

        let url = std::env::var(URL_ENV).ok().or(file.installation.url);
        if let Some(url) = url {
            builder = builder.server_url(url);
        }
        let token = std::env::var(TOKEN_ENV).ok().or(file.installation.api_token);
        if let Some(token) = token {
            builder = builder.api_token(token);
        }
        if let Some(days) = file.installation.archived_retention_days {
            builder = builder.archived_retention_days(days);
        }

        Ok(Self {
            app: builder.build()?,
            sync: file.sync,
        })
    }

    /// Get the API token
    pub fn api_token(&self) -> Option<&str> {
        self.app.api_token.as_deref()
    }

    pub fn server_url(&self) -> Option<&str> {
        self.app.server_url.as_deref()
    }

    pub fn archived_retention_days(&self) -> u32 {
        self.app.archived_retention_days
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    pub fn sync(&self) -> &SyncConfig {
        &self.sync
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> Result<reqwest::Url> {
        let base = self.server_url().ok_or(ClientError::NotConfigured("server_url"))?;
        let full = format!("{}{}", base, path);
        reqwest::Url::parse(&full).map_err(|e| ClientError::invalid_url(full, e))
    }
}
