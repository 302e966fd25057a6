//! Server settings read from the environment.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::error::{LedgerError, LedgerResult};

/// Environment variable holding the bind host.
pub const HOST_VAR: &str = "WAGE_LEDGER_HOST";
/// Environment variable holding the bind port.
pub const PORT_VAR: &str = "WAGE_LEDGER_PORT";
/// Environment variable holding the seed configuration directory.
pub const CONFIG_VAR: &str = "WAGE_LEDGER_CONFIG";
/// Environment variable holding the snapshot file path.
pub const DATA_VAR: &str = "WAGE_LEDGER_DATA";

/// Where to listen and where to find configuration and data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub addr: SocketAddr,
    /// Seed configuration directory.
    pub config_dir: PathBuf,
    /// Snapshot file; `None` keeps the ledger in memory only.
    pub data_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Reads the server settings from the process environment.
    pub fn from_env() -> LedgerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the server settings through `lookup`.
    ///
    /// Defaults: host `127.0.0.1`, port `3000`, config `./config/default`,
    /// no snapshot file.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LedgerResult<Self> {
        let host = lookup(HOST_VAR).unwrap_or_else(|| "127.0.0.1".to_string());
        let host: IpAddr = host.parse().map_err(|_| {
            LedgerError::invalid_field(HOST_VAR, format!("'{}' is not an IP address", host))
        })?;

        let port = match lookup(PORT_VAR) {
            Some(port) => port.parse::<u16>().map_err(|_| {
                LedgerError::invalid_field(PORT_VAR, format!("'{}' is not a port", port))
            })?,
            None => 3000,
        };

        let config_dir = lookup(CONFIG_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./config/default"));
        let data_path = lookup(DATA_VAR)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            addr: SocketAddr::new(host, port),
            config_dir,
            data_path,
        })
    }
}
