//! Driving port for bearer-token authentication.
//!
//! Inbound adapters call this port to exchange credentials for an opaque
//! token and to resolve inbound tokens back to a user identity, without
//! knowing the backing infrastructure.

use async_trait::async_trait;

use crate::domain::{AuthToken, LoginCredentials};

/// Errors raised by token authenticator adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenAuthenticationError {
    /// Backing store connection could not be established.
    #[error("token store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("token store query failed: {message}")]
    Query { message: String },
    /// Unknown username or password mismatch. Deliberately undifferentiated
    /// so responses cannot be used to probe for registered usernames.
    #[error("unable to log in with provided credentials")]
    InvalidCredentials,
}

impl TokenAuthenticationError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Domain use-case port for issuing and resolving bearer tokens.
#[async_trait]
pub trait TokenAuthenticator: Send + Sync {
    /// Verify credentials and return the caller's token, creating one on
    /// first login and returning the same key on every login thereafter.
    async fn issue(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthToken, TokenAuthenticationError>;

    /// Resolve a bearer token key to the owning user id, or `None` when the
    /// key is unknown.
    async fn resolve(&self, key: &str) -> Result<Option<i32>, TokenAuthenticationError>;
}
