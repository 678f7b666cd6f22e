//! Diesel-backed `SegmentRepository` adapter.
//!
//! Deletion removes dependent vehicles and the segment inside a single
//! transaction, mirroring the `ON DELETE CASCADE` constraint so the cascade
//! is explicit rather than a schema side effect.

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{SegmentPersistenceError, SegmentRepository};
use crate::domain::{Segment, SegmentDraft};

use super::models::{NewSegmentRow, SegmentChangeset, SegmentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{segments, vehicles};

/// Diesel-backed implementation of the `SegmentRepository` port.
#[derive(Clone)]
pub struct DieselSegmentRepository {
    pool: DbPool,
}

impl DieselSegmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain segment persistence errors.
fn map_pool_error(error: PoolError) -> SegmentPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            SegmentPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to domain segment persistence errors.
fn map_diesel_error(error: diesel::result::Error) -> SegmentPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            SegmentPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => SegmentPersistenceError::query("record not found"),
        _ => SegmentPersistenceError::query("database error"),
    }
}

fn row_to_segment(row: SegmentRow) -> Segment {
    Segment::new(row.id, row.segment_name)
}

#[async_trait::async_trait]
impl SegmentRepository for DieselSegmentRepository {
    async fn list(&self) -> Result<Vec<Segment>, SegmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<SegmentRow> = segments::table
            .select(SegmentRow::as_select())
            .order_by(segments::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_segment).collect())
    }

    async fn find(&self, id: i32) -> Result<Option<Segment>, SegmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<SegmentRow> = segments::table
            .filter(segments::id.eq(id))
            .select(SegmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_segment))
    }

    async fn insert(&self, draft: &SegmentDraft) -> Result<Segment, SegmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: SegmentRow = diesel::insert_into(segments::table)
            .values(&NewSegmentRow {
                segment_name: draft.segment_name(),
            })
            .returning(SegmentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(row_to_segment(row))
    }

    async fn update(
        &self,
        id: i32,
        draft: &SegmentDraft,
    ) -> Result<Option<Segment>, SegmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<SegmentRow> = diesel::update(segments::table.filter(segments::id.eq(id)))
            .set(&SegmentChangeset {
                segment_name: draft.segment_name(),
            })
            .returning(SegmentRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_segment))
    }

    async fn delete(&self, id: i32) -> Result<bool, SegmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (dependents, deleted) = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let dependents =
                        diesel::delete(vehicles::table.filter(vehicles::segment_id.eq(id)))
                            .execute(conn)
                            .await?;
                    let deleted = diesel::delete(segments::table.filter(segments::id.eq(id)))
                        .execute(conn)
                        .await?;
                    Ok((dependents, deleted))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        if deleted > 0 {
            debug!(segment_id = id, dependents, "segment deleted with dependents");
        }
        Ok(deleted > 0)
    }
}
