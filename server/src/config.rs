//! Server configuration.

use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::PathBuf;

/// Main server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub listen_addr: String,
    /// Listen port.
    pub listen_port: u16,
    /// Location of the snapshot file used by save and load.
    pub snapshot_path: PathBuf,
    /// Log level, used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Emit logs as JSON lines.
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1".to_string(),
            listen_port: 5000,
            snapshot_path: PathBuf::from("data/accounts.csv"),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Values that fail to parse are ignored and the default is kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("BANK_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Some(port) = lookup("BANK_LISTEN_PORT") {
            if let Ok(port) = port.parse() {
                config.listen_port = port;
            }
        }

        if let Some(path) = lookup("BANK_SNAPSHOT_PATH") {
            config.snapshot_path = PathBuf::from(path);
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }

        if let Some(json) = lookup("BANK_LOG_JSON") {
            if let Ok(json) = json.parse() {
                config.log_json = json;
            }
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_port == 0 {
            return Err("Listen port cannot be 0".to_string());
        }

        if self.listen_addr.parse::<IpAddr>().is_err() {
            return Err(format!("Invalid listen address: {}", self.listen_addr));
        }

        if self.snapshot_path.as_os_str().is_empty() {
            return Err("Snapshot path cannot be empty".to_string());
        }

        Ok(())
    }

    /// Address the server binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.listen_addr.parse()?;
        Ok(SocketAddr::new(ip, self.listen_port))
    }
}
