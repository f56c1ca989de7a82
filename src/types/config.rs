//! Configuration for Abacus.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::calc::RoundingMode;
use crate::AbacusResult;

/// Main configuration for Abacus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Calculator settings.
    #[serde(default)]
    pub calculator: CalculatorConfig,

    /// Store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// History listing settings.
    #[serde(default)]
    pub history: HistoryConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-request timeout (in seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Name reported by the health endpoint.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            service_name: default_service_name(),
        }
    }
}

impl ServerConfig {
    /// Address in `host:port` form.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_service_name() -> String {
    "Calculator API".to_string()
}

/// Calculator settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// Rounding policy applied to operands and results.
    #[serde(default)]
    pub rounding: RoundingMode,
}

/// Available store backends.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// SQLite database file.
    #[default]
    Sqlite,
    /// Process-local store, lost on exit.
    Memory,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Sqlite => write!(f, "sqlite"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend used to persist operations.
    #[serde(default)]
    pub backend: StoreBackend,

    /// SQLite database path.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// How long SQLite waits on a locked database (in milliseconds).
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            db_path: default_db_path(),
            busy_timeout_ms: default_busy_timeout(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from(".abacus/abacus.db")
}

fn default_busy_timeout() -> u64 {
    5000
}

/// History listing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Number of records returned when no limit is given.
    #[serde(default = "default_history_limit")]
    pub default_limit: usize,

    /// Upper bound for a requested limit.
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_history_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_history_limit() -> usize {
    50
}

fn default_max_limit() -> usize {
    1000
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> AbacusResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> AbacusResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Creates default configuration.
    pub fn default_config() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            calculator: CalculatorConfig::default(),
            store: StoreConfig::default(),
            history: HistoryConfig::default(),
        }
    }

}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.server.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.calculator.rounding, RoundingMode::Ceiling);
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
        assert_eq!(config.history.default_limit, 50);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [calculator]
            rounding = "half_up"

            [store]
            backend = "memory"
            "#,
        )
        .unwrap();

        assert_eq!(config.calculator.rounding, RoundingMode::HalfUp);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.db_path, PathBuf::from(".abacus/abacus.db"));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("abacus.toml");

        let mut config = Config::default();
        config.server.port = 9191;
        config.history.max_limit = 10;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.server.port, 9191);
        assert_eq!(loaded.history.max_limit, 10);
    }

    #[test]
    fn test_unknown_rounding_is_rejected() {
        let result: Result<Config, _> = toml::from_str(
            r#"
            [calculator]
            rounding = "banker"
            "#,
        );
        assert!(result.is_err());
    }
}
