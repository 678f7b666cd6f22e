//! Diesel-backed `BrandRepository` adapter.
//!
//! Same shape as the segment adapter: CRUD plus an explicit transactional
//! cascade on delete.

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{BrandPersistenceError, BrandRepository};
use crate::domain::{Brand, BrandDraft};

use super::models::{BrandChangeset, BrandRow, NewBrandRow};
use super::pool::{DbPool, PoolError};
use super::schema::{brands, vehicles};

/// Diesel-backed implementation of the `BrandRepository` port.
#[derive(Clone)]
pub struct DieselBrandRepository {
    pool: DbPool,
}

impl DieselBrandRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain brand persistence errors.
fn map_pool_error(error: PoolError) -> BrandPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            BrandPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to domain brand persistence errors.
fn map_diesel_error(error: diesel::result::Error) -> BrandPersistenceError {
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
            BrandPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => BrandPersistenceError::query("record not found"),
        _ => BrandPersistenceError::query("database error"),
    }
}

fn row_to_brand(row: BrandRow) -> Brand {
    Brand::new(row.id, row.brand_name)
}

#[async_trait::async_trait]
impl BrandRepository for DieselBrandRepository {
    async fn list(&self) -> Result<Vec<Brand>, BrandPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BrandRow> = brands::table
            .select(BrandRow::as_select())
            .order_by(brands::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_brand).collect())
    }

    async fn find(&self, id: i32) -> Result<Option<Brand>, BrandPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<BrandRow> = brands::table
            .filter(brands::id.eq(id))
            .select(BrandRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_brand))
    }

    async fn insert(&self, draft: &BrandDraft) -> Result<Brand, BrandPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: BrandRow = diesel::insert_into(brands::table)
            .values(&NewBrandRow {
                brand_name: draft.brand_name(),
            })
            .returning(BrandRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(row_to_brand(row))
    }

    async fn update(
        &self,
        id: i32,
        draft: &BrandDraft,
    ) -> Result<Option<Brand>, BrandPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<BrandRow> = diesel::update(brands::table.filter(brands::id.eq(id)))
            .set(&BrandChangeset {
                brand_name: draft.brand_name(),
            })
            .returning(BrandRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_brand))
    }

    async fn delete(&self, id: i32) -> Result<bool, BrandPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (dependents, deleted) = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let dependents =
                        diesel::delete(vehicles::table.filter(vehicles::brand_id.eq(id)))
                            .execute(conn)
                            .await?;
                    let deleted = diesel::delete(brands::table.filter(brands::id.eq(id)))
                        .execute(conn)
                        .await?;
                    Ok((dependents, deleted))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        if deleted > 0 {
            debug!(brand_id = id, dependents, "brand deleted with dependents");
        }
        Ok(deleted > 0)
    }
}
