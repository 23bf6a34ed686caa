//! Server configuration.
//!
//! Values are resolved in this order, later sources winning:
//! built-in defaults, a TOML file, `KEYSTONE_*` environment variables, and
//! finally command-line flags (applied by the binary).

use std::path::{Path, PathBuf};

use keystone_auth_memory::SeedUser;
use keystone_core::{Error, Result};
use serde::Deserialize;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "KEYSTONE_CONFIG";
/// Overrides `server.host`.
pub const HOST_ENV: &str = "KEYSTONE_HOST";
/// Overrides `server.port`.
pub const PORT_ENV: &str = "KEYSTONE_PORT";
/// Overrides `logging.level`.
pub const LOG_LEVEL_ENV: &str = "KEYSTONE_LOG_LEVEL";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeystoneConfig {
    /// Listener settings.
    pub server: ServerConfig,
    /// Log filter settings.
    pub logging: LoggingConfig,
    /// Accounts created at startup.
    pub users: Vec<SeedUser>,
}

/// Listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind; 0 picks a free port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Log filter settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl KeystoneConfig {
    /// Load configuration from `path` (or `KEYSTONE_CONFIG`), then apply
    /// environment overrides.
    ///
    /// With no file at all, defaults are used. A file that was asked for but
    /// cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `KEYSTONE_*` overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(HOST_ENV) {
            self.server.host = host;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port.parse().map_err(|_| {
                Error::config(format!("{PORT_ENV} must be a port number, got '{port}'"))
            })?;
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            self.logging.level = level;
        }
        Ok(())
    }
}
