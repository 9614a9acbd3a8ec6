//! Server configuration loading from file and environment variables.

use quotebox_db::DbRuntimeSettings;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file. No default: without it the quote
    /// store cannot be opened.
    #[serde(default)]
    pub path: Option<String>,

    /// SQLite busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "quotebox_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_busy_timeout_ms() -> u64 {
    DbRuntimeSettings::default().busy_timeout_ms
}

fn default_pool_max_size() -> u32 {
    DbRuntimeSettings::default().pool_max_size
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl DatabaseConfig {
    /// Pool tunables derived from this section.
    pub fn runtime_settings(&self) -> DbRuntimeSettings {
        DbRuntimeSettings {
            busy_timeout_ms: self.busy_timeout_ms,
            pool_max_size: self.pool_max_size,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but cannot be used.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl Config {
    /// Rejects values that would only fail later, deep inside startup.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.pool_max_size == 0 {
            return Err(ConfigError::Invalid {
                field: "database.pool_max_size",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `QUOTEBOX_HOST` overrides `server.host`
/// - `QUOTEBOX_PORT` overrides `server.port`
/// - `QUOTEBOX_DB_PATH` overrides `database.path`
/// - `QUOTEBOX_DB_BUSY_TIMEOUT_MS` overrides `database.busy_timeout_ms`
/// - `QUOTEBOX_DB_POOL_MAX_SIZE` overrides `database.pool_max_size`
/// - `QUOTEBOX_LOG_LEVEL` overrides `logging.level`
/// - `QUOTEBOX_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed,
/// or if the merged configuration holds an unusable value.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    if let Ok(host) = std::env::var("QUOTEBOX_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("QUOTEBOX_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(db_path) = std::env::var("QUOTEBOX_DB_PATH") {
        config.database.path = Some(db_path);
    }
    if let Ok(timeout) = std::env::var("QUOTEBOX_DB_BUSY_TIMEOUT_MS") {
        if let Ok(parsed) = timeout.parse() {
            config.database.busy_timeout_ms = parsed;
        }
    }
    if let Ok(size) = std::env::var("QUOTEBOX_DB_POOL_MAX_SIZE") {
        if let Ok(parsed) = size.parse() {
            config.database.pool_max_size = parsed;
        }
    }
    if let Ok(level) = std::env::var("QUOTEBOX_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("QUOTEBOX_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    config.validate()?;
    Ok(config)
}
