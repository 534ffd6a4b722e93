//! Service configuration
//!
//! TOML file plus environment overrides. Every section has defaults, so a
//! missing config file starts a usable development service.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Complete service configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub data_source: DataSourceConfig,
    pub query: QueryConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Model artifact location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub artifact_path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from("./models/churn.artifact.json"),
        }
    }
}

/// Which data source collaborator to construct.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSourceConfig {
    /// Local JSON snapshot.
    File { path: PathBuf },
    /// Remote fetch-by-window endpoint (requires the `remote_source`
    /// feature).
    Http { url: String },
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        DataSourceConfig::File {
            path: PathBuf::from("./data/customers.json"),
        }
    }
}

/// Query window bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Window used when a query names no count.
    pub default_window: usize,
    /// Upper bound on any requested window.
    pub max_window: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_window: 50,
            max_window: 5000,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file, or defaults when no path is
    /// given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                let config: ServiceConfig = toml::from_str(&contents)?;
                info!(path = %path.display(), "configuration loaded");
                config
            }
            None => {
                info!("no config file given, using defaults");
                ServiceConfig::default()
            }
        };
        Ok(config)
    }

    /// Apply environment overrides (`CHURN_HOST`, `CHURN_PORT`,
    /// `CHURN_ARTIFACT_PATH`).
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("CHURN_HOST") {
            if !host.trim().is_empty() {
                self.server.host = host.trim().to_string();
            }
        }
        if let Some(port) = std::env::var("CHURN_PORT")
            .ok()
            .and_then(|v| v.trim().parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Ok(path) = std::env::var("CHURN_ARTIFACT_PATH") {
            if !path.trim().is_empty() {
                self.model.artifact_path = PathBuf::from(path.trim());
            }
        }
    }

    /// Validate cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.query.default_window == 0 {
            return Err(ConfigError::Invalid(
                "query.default_window must be at least 1".to_string(),
            ));
        }
        if self.query.max_window < self.query.default_window {
            return Err(ConfigError::Invalid(format!(
                "query.max_window ({}) is below query.default_window ({})",
                self.query.max_window, self.query.default_window
            )));
        }
        Ok(())
    }

    /// Resolved listener address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("invalid bind address: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.query.default_window, 50);
        assert!(config.bind_addr().is_ok());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [server]
            port = 9100

            [data_source]
            kind = "http"
            url = "http://sheets-bridge.internal/records"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.query.max_window, 5000);
        assert!(matches!(config.data_source, DataSourceConfig::Http { .. }));
    }

    #[test]
    fn window_bounds_are_validated() {
        let mut config = ServiceConfig::default();
        config.query.default_window = 100;
        config.query.max_window = 10;
        assert!(config.validate().is_err());

        config.query.default_window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_bind_address_is_rejected() {
        let mut config = ServiceConfig::default();
        config.server.host = "not an address".to_string();
        assert!(config.bind_addr().is_err());
    }
}
