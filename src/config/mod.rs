//! Configuration management for fairplay
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote playlist provider configuration
    pub provider: ProviderConfig,

    /// Playlist manager configuration
    pub manager: ManagerConfig,

    /// Control API configuration
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Remote playlist provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API base URL (without the `/v1` prefix)
    pub base_url: String,

    /// OAuth bearer token
    pub access_token: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Maximum requests per second
    pub requests_per_second: u32,
}

/// Playlist manager configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Seconds between reorder passes of one playlist
    pub pass_interval_secs: u64,

    /// Run the first pass as soon as a playlist is managed
    pub trigger_on_start: bool,

    /// Capacity of the manager event channel
    pub event_capacity: usize,
}

/// Control API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the control API binds to
    pub bind_address: SocketAddr,

    /// Log every HTTP request
    pub enable_request_logging: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://api.spotify.com"),
            access_token: String::new(),
            request_timeout_secs: 10,
            requests_per_second: 5,
        }
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            pass_interval_secs: 10,
            trigger_on_start: false,
            event_capacity: 64,
        }
    }
}

impl ManagerConfig {
    /// Get pass interval as Duration
    #[must_use]
    pub fn pass_interval(&self) -> Duration {
        Duration::from_secs(self.pass_interval_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8088)),
            enable_request_logging: true,
        }
    }
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
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let base_url = std::env::var("FAIRPLAY_API_BASE_URL")
            .unwrap_or(defaults.provider.base_url);

        let access_token = std::env::var("FAIRPLAY_ACCESS_TOKEN")
            .or_else(|_| std::env::var("SPOTIFY_ACCESS_TOKEN"))
            .unwrap_or_default();

        let request_timeout_secs = std::env::var("FAIRPLAY_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.provider.request_timeout_secs);

        let requests_per_second = std::env::var("FAIRPLAY_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.provider.requests_per_second);

        let pass_interval_secs = std::env::var("FAIRPLAY_PASS_INTERVAL")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.manager.pass_interval_secs);

        let trigger_on_start = std::env::var("FAIRPLAY_TRIGGER_ON_START")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(defaults.manager.trigger_on_start);

        let bind_address = match std::env::var("FAIRPLAY_BIND_ADDRESS") {
            Ok(value) => value
                .parse::<SocketAddr>()
                .with_context(|| format!("Invalid FAIRPLAY_BIND_ADDRESS: {value}"))?,
            Err(_) => defaults.server.bind_address,
        };

        let log_level =
            std::env::var("FAIRPLAY_LOG_LEVEL").unwrap_or(defaults.logging.level);

        let log_format =
            std::env::var("FAIRPLAY_LOG_FORMAT").unwrap_or(defaults.logging.format);

        Ok(Self {
            provider: ProviderConfig {
                base_url,
                access_token,
                request_timeout_secs,
                requests_per_second,
            },
            manager: ManagerConfig {
                pass_interval_secs,
                trigger_on_start,
                event_capacity: defaults.manager.event_capacity,
            },
            server: ServerConfig {
                bind_address,
                enable_request_logging: defaults.server.enable_request_logging,
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.provider.base_url.trim().is_empty() {
            anyhow::bail!("provider.base_url must not be empty");
        }

        if self.provider.request_timeout_secs == 0 {
            anyhow::bail!("provider.request_timeout_secs must be greater than 0");
        }

        if self.provider.requests_per_second == 0 {
            anyhow::bail!("provider.requests_per_second must be greater than 0");
        }

        if self.manager.pass_interval_secs == 0 {
            anyhow::bail!("manager.pass_interval_secs must be greater than 0");
        }

        if self.manager.event_capacity == 0 {
            anyhow::bail!("manager.event_capacity must be greater than 0");
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.provider.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_pass_interval() {
        let mut config = Config::default();
        config.manager.pass_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_rate_limit() {
        let mut config = Config::default();
        config.provider.requests_per_second = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duration_conversions() {
        let config = Config::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.manager.pass_interval(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[manager]\npass_interval_secs = 30\n").unwrap();
        assert_eq!(config.manager.pass_interval_secs, 30);
        assert!(!config.manager.trigger_on_start);
        assert_eq!(config.provider.base_url, "https://api.spotify.com");
    }
}
