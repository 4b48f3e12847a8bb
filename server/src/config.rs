//! Server configuration module.
//!
//! Configuration is loaded from environment variables; every variable has a
//! default so the server starts with no environment at all.
//!
//! # Environment Variables
//!
//! - `BLOCKDOC_LISTEN_ADDR`: Address to bind (default: `127.0.0.1`)
//! - `BLOCKDOC_LISTEN_PORT`: Port to listen on (default: `3000`)

use std::net::{IpAddr, SocketAddr};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the listener to.
    pub listen_addr: IpAddr,
    /// Port to listen on for HTTP connections.
    pub listen_port: u16,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    /// Default port for the server.
    pub const DEFAULT_PORT: u16 = 3000;
    /// Default listen address.
    pub const DEFAULT_LISTEN_ADDR: IpAddr = IpAddr::V4(std::net::Ipv4Addr::LOCALHOST);

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but does not parse as an
    /// address or a port.
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = Self::load_listen_addr()?;
        let listen_port = Self::load_listen_port()?;

        Ok(Self {
            listen_addr,
            listen_port,
        })
    }

    /// The socket address to bind.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_addr, self.listen_port)
    }

    /// Load the listen address from environment.
    ///
    /// Returns the default if not set.
    fn load_listen_addr() -> Result<IpAddr, ConfigError> {
        match std::env::var("BLOCKDOC_LISTEN_ADDR") {
            Ok(value) => value.parse::<IpAddr>().map_err(|_| ConfigError::InvalidValue {
                name: "BLOCKDOC_LISTEN_ADDR".to_string(),
                message: format!("'{value}' is not a valid IP address"),
            }),
            Err(_) => Ok(Self::DEFAULT_LISTEN_ADDR),
        }
    }

    /// Load the listen port from environment.
    ///
    /// Returns the default if not set.
    fn load_listen_port() -> Result<u16, ConfigError> {
        match std::env::var("BLOCKDOC_LISTEN_PORT") {
            Ok(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "BLOCKDOC_LISTEN_PORT".to_string(),
                message: format!("'{value}' is not a valid port number (must be 1-65535)"),
            }),
            Err(_) => Ok(Self::DEFAULT_PORT),
        }
    }
}
