//! Configuration for search-rs

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, SearchError};
use crate::types::DEFAULT_PAGE_SIZE;

/// Prefix for environment overrides, e.g. `SEARCH_RS__BACKEND__BASE_URL`
pub const ENV_PREFIX: &str = "SEARCH_RS";

/// Main configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Search backend
    pub backend: BackendConfig,
    /// Session behaviour
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Site base URL (e.g., "https://wildatlanticway.example")
    pub base_url: String,
    /// Search endpoint path
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

/// Session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Results requested per page, including load-more pages
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Per-fetch timeout; no timeout when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_timeout_seconds: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default level for the search_rs target
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_endpoint() -> String {
    "/api/search".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            fetch_timeout_seconds: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl SessionConfig {
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_seconds.map(Duration::from_secs)
    }
}

impl SearchConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SearchError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| SearchError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Layered load: development defaults, then the optional TOML file,
    /// then `SEARCH_RS__*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = config::Config::try_from(&Self::development())
            .map_err(|e| SearchError::Config(format!("Failed to build defaults: {}", e)))?;

        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| SearchError::Config(format!("Failed to load config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Create a default development configuration
    pub fn development() -> Self {
        Self {
            backend: BackendConfig {
                base_url: "http://localhost:3000".to_string(),
                endpoint: default_endpoint(),
            },
            session: SessionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.backend.base_url).map_err(|e| {
            SearchError::Config(format!("Invalid base URL '{}': {}", self.backend.base_url, e))
        })?;

        if !self.backend.endpoint.starts_with('/') {
            return Err(SearchError::Config(format!(
                "Endpoint must be an absolute path, got '{}'",
                self.backend.endpoint
            )));
        }

        if self.session.page_size == 0 {
            return Err(SearchError::Config("page_size must be greater than 0".to_string()));
        }

        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::development()
    }
}
