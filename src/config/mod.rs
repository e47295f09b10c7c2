//! Configuration management for fluxsave
//!
//! Configuration is read once at startup from environment variables and is
//! never mutated afterwards.

use std::fmt;
use std::net::SocketAddr;

/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 8080;

/// Environment variable holding the Miniflux base URL
pub const ENV_API_URL: &str = "MINIFLUX_API_URL";

/// Environment variable holding the Miniflux API token
pub const ENV_API_TOKEN: &str = "MINIFLUX_API_TOKEN";

/// Main configuration structure
#[derive(Clone)]
pub struct Config {
    /// Miniflux base URL
    pub api_url: String,

    /// Miniflux API token
    pub api_token: String,

    /// Local HTTP listen port
    pub port: u16,

    /// Long-running mode instead of a single processing pass
    pub daemon: bool,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values are treated the same as unset ones
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let (api_url, api_token) = match (var(ENV_API_URL), var(ENV_API_TOKEN)) {
            (Some(url), Some(token)) => (url, token),
            _ => return Err(ConfigError::MissingVar),
        };

        let port = match var("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                field: "PORT".to_string(),
                reason: format!("'{raw}' is not a valid port number"),
            })?,
            None => DEFAULT_PORT,
        };

        let daemon = var("DAEMON").as_deref() == Some("true");

        let defaults = LoggingConfig::default();
        let logging = LoggingConfig {
            level: var("LOG_LEVEL").unwrap_or(defaults.level),
            format: var("LOG_FORMAT").unwrap_or(defaults.format),
        };

        let config = Self {
            api_url,
            api_token,
            port,
            daemon,
            logging,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.api_url).map_err(|e| ConfigError::InvalidValue {
            field: ENV_API_URL.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: ENV_API_URL.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "LOG_FORMAT".to_string(),
                reason: format!("expected 'text' or 'json', got '{}'", self.logging.format),
            });
        }

        Ok(())
    }

    /// Address the HTTP listener binds to (all interfaces)
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("api_token", &"<redacted>")
            .field("port", &self.port)
            .field("daemon", &self.daemon)
            .field("logging", &self.logging)
            .finish()
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("MINIFLUX_API_URL and MINIFLUX_API_TOKEN must be set")]
    MissingVar,

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
