//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use reqwest::Url;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::upload::UPLOAD_PATH;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_graphql_url")]
    pub graphql_url: String,

    /// Upload endpoint; `/upload` on the GraphQL server's origin when unset
    #[serde(default)]
    pub upload_url: Option<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_graphql_url() -> String {
    "http://localhost:3000/graphql".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            graphql_url: default_graphql_url(),
            upload_url: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn graphql_endpoint(&self) -> Result<Url, ConfigError> {
        parse_url(&self.graphql_url)
    }

    /// Resolve the upload endpoint
    pub fn upload_endpoint(&self) -> Result<Url, ConfigError> {
        match &self.upload_url {
            Some(url) => parse_url(url),
            None => {
                let graphql = self.graphql_endpoint()?;
                graphql.join(UPLOAD_PATH).map_err(|e| ConfigError::InvalidUrl {
                    url: self.graphql_url.clone(),
                    error: e.to_string(),
                })
            }
        }
    }
}

fn parse_url(url: &str) -> Result<Url, ConfigError> {
    Url::parse(url).map_err(|e| ConfigError::InvalidUrl {
        url: url.to_string(),
        error: e.to_string(),
    })
}

/// Where the session token is persisted
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_token_file")]
    pub token_file: String,
}

fn default_token_file() -> String {
    dirs::data_local_dir()
        .map(|p| {
            p.join("mediadesk")
                .join("storage.json")
                .to_string_lossy()
                .to_string()
        })
        .unwrap_or_else(|| "./mediadesk_storage.json".to_string())
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// The first config file that exists is used. An unreadable or invalid
    /// file is an error rather than a silent fallback to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("mediadesk").join("config.toml")),
            Some(PathBuf::from("./mediadesk.toml")),
        ];

        Self::load_first(config_paths.iter().flatten())
    }

    fn load_first<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) -> Result<Self, ConfigError> {
        match paths.into_iter().find(|path| path.exists()) {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::from_env()),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("MEDIADESK_GRAPHQL_URL") {
            self.api.graphql_url = url;
        }
        if let Ok(url) = std::env::var("MEDIADESK_UPLOAD_URL") {
            self.api.upload_url = Some(url);
        }
        if let Ok(path) = std::env::var("MEDIADESK_TOKEN_FILE") {
            self.session.token_file = path;
        }
        if let Ok(level) = std::env::var("MEDIADESK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("MEDIADESK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid URL {url:?}: {error}")]
    InvalidUrl { url: String, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Mediadesk Configuration
#
# Environment variables override these settings:
# - MEDIADESK_GRAPHQL_URL
# - MEDIADESK_UPLOAD_URL
# - MEDIADESK_TOKEN_FILE
# - MEDIADESK_LOG_LEVEL
# - MEDIADESK_LOG_FORMAT

[api]
# GraphQL endpoint
graphql_url = "http://localhost:3000/graphql"

# Upload endpoint (default: /upload on the GraphQL server's origin)
# upload_url = "http://localhost:3000/upload"

# Request timeout in seconds
request_timeout_secs = 30

[session]
# File holding the session token
# token_file = "~/.local/share/mediadesk/storage.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty or json
format = "pretty"
"#
    .to_string()
}
