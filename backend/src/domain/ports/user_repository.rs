//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{Registration, User};

/// Persistence errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
    /// The candidate username is already registered.
    #[error("username is already taken")]
    DuplicateUsername,
}

impl UserPersistenceError {
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

/// Driven port for account storage.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account, hashing the candidate password at rest.
    ///
    /// Fails with [`UserPersistenceError::DuplicateUsername`] when the
    /// username is taken; no partial row survives a failed registration.
    async fn create(&self, registration: &Registration) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, UserPersistenceError>;

    /// Administrative removal of an account and, transactionally, every
    /// vehicle and token it owns. Returns whether the account existed.
    async fn delete(&self, id: i32) -> Result<bool, UserPersistenceError>;
}
