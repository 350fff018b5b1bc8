use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::interface_adapters::facebook_api::DEFAULT_GRAPH_URL;

// Runtime configuration, loaded once at startup and immutable afterwards.

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{key} must be a number, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub facebook: FacebookConfig,
    pub token: TokenConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FacebookConfig {
    pub client_id: String,
    pub client_secret: String,
    pub graph_url: String,
    pub timeout_ms: u64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    pub secret: String,
    pub ttl_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3002,
            database_url: None,
            facebook: FacebookConfig::default(),
            token: TokenConfig::default(),
        }
    }
}

impl Default for FacebookConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            graph_url: DEFAULT_GRAPH_URL.to_string(),
            timeout_ms: 5_000,
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            // 30 minutes.
            ttl_ms: 30 * 60 * 1000,
        }
    }
}

impl AppConfig {
    /// Builds the config from an optional TOML file (`AUTH_CONFIG_PATH`)
    /// overlaid with environment variables, then validates it.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var_os("AUTH_CONFIG_PATH") {
            Some(path) => Self::from_file(PathBuf::from(path))?,
            None => Self::default(),
        };

        let config = base.with_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::Read { path, source })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    // Apply variables returned by `lookup` on top of the current values.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("AUTH_SERVER_PORT") {
            self.port = parse_number("AUTH_SERVER_PORT", port)?;
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|url| !url.is_empty()) {
            self.database_url = Some(url);
        }
        if let Some(client_id) = lookup("FACEBOOK_CLIENT_ID") {
            self.facebook.client_id = client_id;
        }
        if let Some(client_secret) = lookup("FACEBOOK_CLIENT_SECRET") {
            self.facebook.client_secret = client_secret;
        }
        if let Some(graph_url) = lookup("FACEBOOK_GRAPH_URL") {
            self.facebook.graph_url = graph_url;
        }
        if let Some(timeout) = lookup("FACEBOOK_TIMEOUT_MS") {
            self.facebook.timeout_ms = parse_number("FACEBOOK_TIMEOUT_MS", timeout)?;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.token.secret = secret;
        }
        if let Some(ttl) = lookup("ACCESS_TOKEN_TTL_MS") {
            self.token.ttl_ms = parse_number("ACCESS_TOKEN_TTL_MS", ttl)?;
        }

        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.facebook.client_id.trim().is_empty() {
            return Err(ConfigError::Missing("FACEBOOK_CLIENT_ID"));
        }
        if self.facebook.client_secret.trim().is_empty() {
            return Err(ConfigError::Missing("FACEBOOK_CLIENT_SECRET"));
        }
        if self.token.secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if self.token.ttl_ms == 0 {
            return Err(ConfigError::Zero("ACCESS_TOKEN_TTL_MS"));
        }
        if self.facebook.timeout_ms == 0 {
            return Err(ConfigError::Zero("FACEBOOK_TIMEOUT_MS"));
        }

        Ok(())
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_millis(self.token.ttl_ms)
    }

    pub fn facebook_timeout(&self) -> Duration {
        Duration::from_millis(self.facebook.timeout_ms)
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { key, value })
}
