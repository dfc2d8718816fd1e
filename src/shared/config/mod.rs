//! Installation configuration
//!
//! Describes where the article server lives and how to authenticate
//! against it. Built through [`AppConfigBuilder`] so the base URL is
//! validated once, up front, instead of on every request.

use thiserror::Error;

/// Number of days archived articles are kept in the local cache
pub const DEFAULT_ARCHIVED_RETENTION_DAYS: u32 = 30;

/// Installation settings for one article server
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server base URL, e.g. `https://notes.example.com`
    pub server_url: Option<String>,
    /// Bearer token sent in the `Authorization` header
    pub api_token: Option<String>,
    /// Retention window for cached archived articles
    pub archived_retention_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            api_token: None,
            archived_retention_days: DEFAULT_ARCHIVED_RETENTION_DAYS,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.server_url {
            validate_server_url(url)?;
        }
        if matches!(&self.api_token, Some(token) if token.trim().is_empty()) {
            return Err(ConfigError::MissingValue("api_token"));
        }
        Ok(())
    }

    /// Whether both the server URL and the token are present
    pub fn is_configured(&self) -> bool {
        self.server_url.is_some() && self.api_token.is_some()
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    api_token: Option<String>,
    archived_retention_days: Option<u32>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the API token
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the archived retention window in days
    pub fn archived_retention_days(mut self, days: u32) -> Self {
        self.archived_retention_days = Some(days);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig {
            server_url: self
                .server_url
                .map(|url| url.trim().trim_end_matches('/').to_string()),
            api_token: self.api_token,
            archived_retention_days: self
                .archived_retention_days
                .unwrap_or(DEFAULT_ARCHIVED_RETENTION_DAYS),
        };
        config.validate()?;
        Ok(config)
    }
}

fn validate_server_url(url: &str) -> Result<(), ConfigError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| ConfigError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidUrl(format!("{url}: unsupported scheme '{other}'"))),
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
