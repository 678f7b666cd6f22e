//! Port abstraction for vehicle persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{VehicleDraft, VehicleRecord};

/// Persistence errors raised by vehicle repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VehiclePersistenceError {
    /// Repository connection could not be established.
    #[error("vehicle repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("vehicle repository query failed: {message}")]
    Query { message: String },
    /// The referenced segment does not exist.
    #[error("referenced segment does not exist")]
    SegmentNotFound,
    /// The referenced brand does not exist.
    #[error("referenced brand does not exist")]
    BrandNotFound,
}

impl VehiclePersistenceError {
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

/// Driven port for vehicle storage.
///
/// Reads carry denormalized segment and brand names; writes resolve the
/// numeric references and fail when either target row is missing.
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// All vehicles ordered by identifier, ascending.
    async fn list(&self) -> Result<Vec<VehicleRecord>, VehiclePersistenceError>;

    /// Fetch a vehicle by identifier.
    async fn find(&self, id: i32) -> Result<Option<VehicleRecord>, VehiclePersistenceError>;

    /// Persist a new vehicle owned by `owner` and return the stored record.
    async fn insert(
        &self,
        owner: i32,
        draft: &VehicleDraft,
    ) -> Result<VehicleRecord, VehiclePersistenceError>;

    /// Replace an existing vehicle; `None` when the id is unknown. The owner
    /// column is left untouched.
    async fn update(
        &self,
        id: i32,
        draft: &VehicleDraft,
    ) -> Result<Option<VehicleRecord>, VehiclePersistenceError>;

    /// Delete a vehicle. Returns whether it existed.
    async fn delete(&self, id: i32) -> Result<bool, VehiclePersistenceError>;
}
