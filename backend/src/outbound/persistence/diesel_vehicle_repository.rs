//! Diesel-backed `VehicleRepository` adapter.
//!
//! Reads join segments and brands to denormalize their names into the
//! record; writes surface foreign-key violations as reference-not-found
//! errors by inspecting the violated constraint.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{VehiclePersistenceError, VehicleRepository};
use crate::domain::{Price, VehicleDraft, VehicleRecord};

use super::models::{NewVehicleRow, VehicleChangeset, VehicleRow};
use super::pool::{DbPool, PoolError};
use super::schema::{brands, segments, vehicles};

/// Diesel-backed implementation of the `VehicleRepository` port.
#[derive(Clone)]
pub struct DieselVehicleRepository {
    pool: DbPool,
}

impl DieselVehicleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain vehicle persistence errors.
fn map_pool_error(error: PoolError) -> VehiclePersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            VehiclePersistenceError::connection(message)
        }
    }
}

/// Map a foreign-key violation to the reference it names.
///
/// Unrecognised FK violations are logged for monitoring; they may indicate
/// new constraints that need specific handling.
fn map_foreign_key_violation(
    message: &str,
    constraint_name: Option<&str>,
) -> VehiclePersistenceError {
    let constraint = constraint_name.map(str::to_lowercase).unwrap_or_default();
    let lower = message.to_lowercase();

    if constraint.contains("segment") || lower.contains("segment") {
        VehiclePersistenceError::SegmentNotFound
    } else if constraint.contains("brand") || lower.contains("brand") {
        VehiclePersistenceError::BrandNotFound
    } else {
        warn!(
            message,
            constraint_name = ?constraint_name,
            "unrecognised foreign key violation"
        );
        VehiclePersistenceError::query("foreign key violation")
    }
}

/// Map Diesel errors to domain vehicle persistence errors.
fn map_diesel_error(error: diesel::result::Error) -> VehiclePersistenceError {
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
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            map_foreign_key_violation(info.message(), info.constraint_name())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            VehiclePersistenceError::connection("database connection error")
        }
        DieselError::NotFound => VehiclePersistenceError::query("record not found"),
        _ => VehiclePersistenceError::query("database error"),
    }
}

/// Convert a joined row to a domain vehicle record.
fn row_to_record(
    (row, segment_name, brand_name): (VehicleRow, String, String),
) -> Result<VehicleRecord, VehiclePersistenceError> {
    let price = Price::new(row.price)
        .map_err(|err| VehiclePersistenceError::query(format!("stored price invalid: {err}")))?;
    Ok(VehicleRecord {
        id: row.id,
        vehicle_name: row.vehicle_name,
        release_year: row.release_year,
        price,
        segment: row.segment_id,
        brand: row.brand_id,
        segment_name,
        brand_name,
        owner: row.user_id,
    })
}

/// Fetch one joined record on an existing connection.
async fn fetch_record<C>(
    conn: &mut C,
    id: i32,
) -> Result<Option<VehicleRecord>, VehiclePersistenceError>
where
    C: diesel_async::AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    let row: Option<(VehicleRow, String, String)> = vehicles::table
        .inner_join(segments::table)
        .inner_join(brands::table)
        .filter(vehicles::id.eq(id))
        .select((
            VehicleRow::as_select(),
            segments::segment_name,
            brands::brand_name,
        ))
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

    row.map(row_to_record).transpose()
}

#[async_trait::async_trait]
impl VehicleRepository for DieselVehicleRepository {
    async fn list(&self) -> Result<Vec<VehicleRecord>, VehiclePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(VehicleRow, String, String)> = vehicles::table
            .inner_join(segments::table)
            .inner_join(brands::table)
            .select((
                VehicleRow::as_select(),
                segments::segment_name,
                brands::brand_name,
            ))
            .order_by(vehicles::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_record).collect()
    }

    async fn find(&self, id: i32) -> Result<Option<VehicleRecord>, VehiclePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        fetch_record(&mut conn, id).await
    }

    async fn insert(
        &self,
        owner: i32,
        draft: &VehicleDraft,
    ) -> Result<VehicleRecord, VehiclePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: VehicleRow = diesel::insert_into(vehicles::table)
            .values(&NewVehicleRow {
                vehicle_name: draft.vehicle_name(),
                release_year: draft.release_year(),
                price: draft.price().as_decimal(),
                user_id: owner,
                segment_id: draft.segment(),
                brand_id: draft.brand(),
            })
            .returning(VehicleRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        fetch_record(&mut conn, row.id)
            .await?
            .ok_or_else(|| VehiclePersistenceError::query("inserted vehicle row missing"))
    }

    async fn update(
        &self,
        id: i32,
        draft: &VehicleDraft,
    ) -> Result<Option<VehicleRecord>, VehiclePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(vehicles::table.filter(vehicles::id.eq(id)))
            .set(&VehicleChangeset {
                vehicle_name: draft.vehicle_name(),
                release_year: draft.release_year(),
                price: draft.price().as_decimal(),
                segment_id: draft.segment(),
                brand_id: draft.brand(),
            })
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated == 0 {
            return Ok(None);
        }
        fetch_record(&mut conn, id).await
    }

    async fn delete(&self, id: i32) -> Result<bool, VehiclePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(vehicles::table.filter(vehicles::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the constraint-name mapping.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("vehicles_segment_id_fkey"), VehiclePersistenceError::SegmentNotFound)]
    #[case(Some("vehicles_brand_id_fkey"), VehiclePersistenceError::BrandNotFound)]
    fn maps_known_constraints(
        #[case] constraint: Option<&str>,
        #[case] expected: VehiclePersistenceError,
    ) {
        let mapped = map_foreign_key_violation("violates foreign key constraint", constraint);
        assert_eq!(mapped, expected);
    }

    #[test]
    fn unknown_constraints_map_to_query_errors() {
        let mapped = map_foreign_key_violation("violates foreign key constraint", Some("other"));
        assert_eq!(
            mapped,
            VehiclePersistenceError::query("foreign key violation")
        );
    }
}
