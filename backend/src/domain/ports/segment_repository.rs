//! Port abstraction for segment persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{Segment, SegmentDraft};

/// Persistence errors raised by segment repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SegmentPersistenceError {
    /// Repository connection could not be established.
    #[error("segment repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("segment repository query failed: {message}")]
    Query { message: String },
}

impl SegmentPersistenceError {
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

/// Driven port for segment storage.
///
/// Segments are shared reference data: no per-user scoping applies.
#[async_trait]
pub trait SegmentRepository: Send + Sync {
    /// All segments ordered by identifier, ascending.
    async fn list(&self) -> Result<Vec<Segment>, SegmentPersistenceError>;

    /// Fetch a segment by identifier.
    async fn find(&self, id: i32) -> Result<Option<Segment>, SegmentPersistenceError>;

    /// Persist a new segment and return it with its assigned identifier.
    async fn insert(&self, draft: &SegmentDraft) -> Result<Segment, SegmentPersistenceError>;

    /// Replace an existing segment; `None` when the id is unknown.
    async fn update(
        &self,
        id: i32,
        draft: &SegmentDraft,
    ) -> Result<Option<Segment>, SegmentPersistenceError>;

    /// Delete a segment and, in the same transaction, every vehicle that
    /// references it. Returns whether the segment existed.
    async fn delete(&self, id: i32) -> Result<bool, SegmentPersistenceError>;
}
