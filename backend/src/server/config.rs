//! Server configuration read from the environment.

use std::env;
use std::net::SocketAddr;

/// Default bind address when `BIND_ADDR` is unset.
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Errors raised while assembling the server configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `DATABASE_URL` was not provided.
    #[error("DATABASE_URL must be set")]
    MissingDatabaseUrl,
    /// `BIND_ADDR` could not be parsed as a socket address.
    #[error("invalid bind address: {value}")]
    InvalidBindAddr { value: String },
}

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    bind_addr: SocketAddr,
    database_url: String,
}

impl ServerConfig {
    /// Assemble the configuration from `DATABASE_URL` and `BIND_ADDR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;
        let raw_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned());
        Ok(Self {
            bind_addr: parse_bind_addr(&raw_addr)?,
            database_url,
        })
    }

    /// Construct a configuration from explicit values.
    pub fn new(bind_addr: SocketAddr, database_url: impl Into<String>) -> Self {
        Self {
            bind_addr,
            database_url: database_url.into(),
        }
    }

    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// PostgreSQL connection string for pool and migrations.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

fn parse_bind_addr(raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidBindAddr {
        value: raw.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0.0.0.0:8000")]
    #[case("127.0.0.1:9090")]
    #[case("[::1]:8000")]
    fn parses_valid_bind_addresses(#[case] raw: &str) {
        let addr = parse_bind_addr(raw).expect("valid socket address");
        assert_eq!(addr.to_string(), raw);
    }

    #[rstest]
    #[case("localhost:8000")]
    #[case("8000")]
    #[case("")]
    fn rejects_invalid_bind_addresses(#[case] raw: &str) {
        let err = parse_bind_addr(raw).expect_err("invalid socket address");
        assert_eq!(
            err,
            ConfigError::InvalidBindAddr {
                value: raw.to_owned()
            }
        );
    }

    #[test]
    fn default_bind_addr_parses() {
        let addr = parse_bind_addr(DEFAULT_BIND_ADDR).expect("default must parse");
        assert_eq!(addr.port(), 8000);
    }
}
