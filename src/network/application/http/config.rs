use serde::Deserialize;

/// Listen queue length used when none is configured.
pub const DEFAULT_BACKLOG: u8 = 16;

/// Address used when none is configured.
pub const DEFAULT_ADDRESS: &str = "0.0.0.0:80";

/// Runtime settings for the listener that feeds connections to a
/// [`Server`](super::Server).
///
/// The engine itself only needs a route table; these settings are consumed by
/// the transport glue (for example [`TcpAcceptor`](crate::network::tcp::TcpAcceptor)
/// or a board's TCP stack). Configurations are usually stored as JSON in flash
/// and parsed without allocation:
///
/// ```rust
/// use libhttpd::network::application::http::ServerConfig;
///
/// let config = ServerConfig::from_json(r#"{"address":"0.0.0.0:8081","backlog":4}"#).unwrap();
/// assert_eq!(config.address, "0.0.0.0:8081");
/// assert_eq!(config.backlog, 4);
/// assert_eq!(config.read_timeout_ms, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ServerConfig<'a> {
    /// `host:port` to listen on.
    #[serde(borrow, default = "default_address")]
    pub address: &'a str,
    /// Pending-connection queue length, advisory only.
    ///
    /// It is handed to platform listeners that accept one. The `std` adapter,
    /// `TcpAcceptor`, ignores it and uses the
    /// operating system default.
    #[serde(default = "default_backlog")]
    pub backlog: u8,
    /// Per-read timeout in milliseconds, `0` disables it.
    #[serde(default)]
    pub read_timeout_ms: u32,
}

/// Configuration parsing failures.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ConfigError {
    /// The input is not a valid configuration document.
    Invalid,
}

fn default_address() -> &'static str {
    DEFAULT_ADDRESS
}

fn default_backlog() -> u8 {
    DEFAULT_BACKLOG
}

impl<'a> ServerConfig<'a> {
    /// Parses a JSON configuration document.
    pub fn from_json(json: &'a str) -> Result<Self, ConfigError> {
        let (config, _): (ServerConfig<'a>, _) =
            serde_json_core::from_str(json).map_err(|_| ConfigError::Invalid)?;
        Ok(config)
    }
}

impl Default for ServerConfig<'_> {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            backlog: DEFAULT_BACKLOG,
            read_timeout_ms: 0,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ConfigError::Invalid => defmt::write!(f, "Invalid"),
        }
    }
}
