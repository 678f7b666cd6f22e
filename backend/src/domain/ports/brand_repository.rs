//! Port abstraction for brand persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{Brand, BrandDraft};

/// Persistence errors raised by brand repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrandPersistenceError {
    /// Repository connection could not be established.
    #[error("brand repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("brand repository query failed: {message}")]
    Query { message: String },
}

impl BrandPersistenceError {
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

/// Driven port for brand storage.
///
/// Brands are shared reference data: no per-user scoping applies.
#[async_trait]
pub trait BrandRepository: Send + Sync {
    /// All brands ordered by identifier, ascending.
    async fn list(&self) -> Result<Vec<Brand>, BrandPersistenceError>;

    /// Fetch a brand by identifier.
    async fn find(&self, id: i32) -> Result<Option<Brand>, BrandPersistenceError>;

    /// Persist a new brand and return it with its assigned identifier.
    async fn insert(&self, draft: &BrandDraft) -> Result<Brand, BrandPersistenceError>;

    /// Replace an existing brand; `None` when the id is unknown.
    async fn update(
        &self,
        id: i32,
        draft: &BrandDraft,
    ) -> Result<Option<Brand>, BrandPersistenceError>;

    /// Delete a brand and, in the same transaction, every vehicle that
    /// references it. Returns whether the brand existed.
    async fn delete(&self, id: i32) -> Result<bool, BrandPersistenceError>;
}
