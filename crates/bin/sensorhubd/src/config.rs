//! Configuration loading: an optional `sensorhub.toml` plus environment
//! overrides.
//!
//! Every field has a default, so the file may be absent. Environment
//! variables win over file values; `RUST_LOG` wins over `SENSORHUB_LOG`.

use std::path::Path;

use serde::Deserialize;

/// Default config file, resolved against the working directory.
pub const DEFAULT_PATH: &str = "sensorhub.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Storage settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port, never zero.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `sqlx` connection URL.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive in `RUST_LOG` syntax.
    pub filter: String,
}

impl Config {
    /// Load [`DEFAULT_PATH`] (if present), then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is unreadable or malformed, an
    /// override cannot be parsed, or the result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file(DEFAULT_PATH)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("SENSORHUB_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SENSORHUB_PORT") {
            self.server.port = parse_port("SENSORHUB_PORT", &port)?;
        }
        if let Some(bind) = lookup("SENSORHUB_BIND") {
            let (host, port) = bind.rsplit_once(':').ok_or_else(|| ConfigError::Env {
                key: "SENSORHUB_BIND",
                value: bind.clone(),
            })?;
            self.server.port = parse_port("SENSORHUB_BIND", port)?;
            self.server.host = host.to_string();
        }
        if let Some(url) = lookup("SENSORHUB_DATABASE_URL") {
            self.database.url = url;
        }
        for key in ["SENSORHUB_LOG", "RUST_LOG"] {
            if let Some(filter) = lookup(key) {
                self.logging.filter = filter;
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "database url must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The `host:port` listen address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Storage adapter configuration derived from `[database]`.
    #[must_use]
    pub fn storage(&self) -> sensorhub_adapter_storage_sqlite_sqlx::Config {
        sensorhub_adapter_storage_sqlite_sqlx::Config {
            database_url: self.database.url.clone(),
        }
    }
}

fn parse_port(key: &'static str, value: &str) -> Result<u16, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env {
        key,
        value: value.to_string(),
    })
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:sensorhub.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "sensorhubd=info,sensorhub=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// An environment override has an unusable value.
    #[error("invalid value for {key}: {value:?}")]
    Env { key: &'static str, value: String },
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
