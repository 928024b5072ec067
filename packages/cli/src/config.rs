use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;

use quillpad_storage::DatabaseConfig;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid host address: {0}")]
    InvalidHost(String),
    #[error("Invalid max connections: {0}")]
    InvalidMaxConnections(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database_path: PathBuf,
    pub max_connections: u32,
    pub cors_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 4001,
            database_path: PathBuf::from("quillpad.db"),
            max_connections: 5,
            cors_origin: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let host = match lookup("QUILLPAD_HOST") {
            Some(raw) => raw
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidHost(raw))?,
            None => defaults.host,
        };

        let port = match lookup("QUILLPAD_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(ConfigError::InvalidPort)?,
            None => defaults.port,
        };

        // Validate port is in valid range
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let database_path = lookup("QUILLPAD_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);

        let max_connections = match lookup("QUILLPAD_MAX_CONNECTIONS") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidMaxConnections(raw)),
            },
            None => defaults.max_connections,
        };

        let cors_origin = lookup("QUILLPAD_CORS_ORIGIN").filter(|origin| !origin.is_empty());

        Ok(Config {
            host,
            port,
            database_path,
            max_connections,
            cors_origin,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn database(&self) -> DatabaseConfig {
        DatabaseConfig {
            path: self.database_path.clone(),
            max_connections: self.max_connections,
            busy_timeout: Duration::from_secs(30),
        }
    }
}
