//! Environment-driven server configuration.
//!
//! Every key has a default; a present but malformed value is an error
//! rather than a silent fallback.

use log::info;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_PORT: &str = "INKWELL_PORT";
pub const ENV_BIND: &str = "INKWELL_BIND";
pub const ENV_DB_PATH: &str = "INKWELL_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "INKWELL_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "INKWELL_LOG_DIR";

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DB_PATH: &str = "inkwell.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {key} value `{value}`: {message}")]
    Invalid {
        key: &'static str,
        value: String,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub db_path: PathBuf,
    pub log_level: String,
    /// Rolling log directory; `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_level: inkwell_core::default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl ServerConfig {
    /// Reads `INKWELL_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Blank values count as
    /// unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &'static str| {
            let value = lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty());
            if value.is_none() {
                info!("event=config_default module=server status=ok key={key}");
            }
            value
        };

        let defaults = Self::default();
        let port = match read(ENV_PORT) {
            Some(raw) => raw.parse::<u16>().map_err(|err| ConfigError::Invalid {
                key: ENV_PORT,
                value: raw.clone(),
                message: err.to_string(),
            })?,
            None => defaults.port,
        };
        let bind = match read(ENV_BIND) {
            Some(raw) => raw.parse::<IpAddr>().map_err(|err| ConfigError::Invalid {
                key: ENV_BIND,
                value: raw.clone(),
                message: err.to_string(),
            })?,
            None => defaults.bind,
        };
        let log_level = match read(ENV_LOG_LEVEL) {
            Some(raw) => validate_level(raw)?,
            None => defaults.log_level,
        };

        Ok(Self {
            bind,
            port,
            db_path: read(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_level,
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

fn validate_level(raw: String) -> Result<String, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "warning" | "error" => Ok(raw),
        _ => Err(ConfigError::Invalid {
            key: ENV_LOG_LEVEL,
            value: raw,
            message: "expected trace|debug|info|warn|error".to_string(),
        }),
    }
}
