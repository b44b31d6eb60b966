//! # API Configuration
//!
//! ## Load Order (later overrides earlier)
//! 1. Default values
//! 2. Config file (`refill.toml` in the platform config dir, or `REFILL_CONFIG`)
//! 3. Environment variables (`REFILL_*`)
//!
//! ## Example `refill.toml`
//! ```toml
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 3001
//!
//! [database]
//! path = "/var/lib/refill/refill.db"
//! max_connections = 5
//!
//! [store]
//! name = "Aqua Fresh Refilling Station"
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use refill_db::DbConfig;

const ENV_CONFIG_PATH: &str = "REFILL_CONFIG";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite file, or `:memory:`.
    pub path: PathBuf,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: PathBuf::from("refill.db"),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Shown by the health endpoint and the frontend header.
    pub name: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: "Refill Station".to_string(),
        }
    }
}

// =============================================================================
// ApiConfig
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub store: StoreSettings,
}

impl ApiConfig {
    /// Loads configuration from file, environment, and defaults.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = ApiConfig::default();

        let path = config_path
            .or_else(|| std::env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `REFILL_*` overrides. `lookup` is `std::env::var` outside tests.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(addr) = lookup("REFILL_BIND_ADDR") {
            debug!(addr = %addr, "Overriding bind address from environment");
            self.server.bind_addr = addr;
        }

        if let Some(port) = lookup("REFILL_PORT") {
            self.server.port = parse_value("REFILL_PORT", &port)?;
        }

        if let Some(path) = lookup("REFILL_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(max) = lookup("REFILL_DB_MAX_CONNECTIONS") {
            self.database.max_connections = parse_value("REFILL_DB_MAX_CONNECTIONS", &max)?;
        }

        if let Some(name) = lookup("REFILL_STORE_NAME") {
            self.store.name = name;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }
        if self.store.name.trim().is_empty() {
            return Err(ConfigError::Invalid("store.name must not be empty".into()));
        }
        self.socket_addr()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.server.bind_addr, self.server.port);
        raw.parse().map_err(|_| ConfigError::InvalidValue {
            key: "server.bind_addr".to_string(),
            value: raw,
        })
    }

    /// Pool settings for [`refill_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        if self.database.path.as_os_str() == ":memory:" {
            return DbConfig::in_memory();
        }
        DbConfig::new(&self.database.path).max_connections(self.database.max_connections)
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "refill", "station")
            .map(|dirs| dirs.config_dir().join("refill.toml"))
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
