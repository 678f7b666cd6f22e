//! Diesel-backed `UserRepository` adapter.
//!
//! Registration hashes the candidate password before anything touches the
//! database; administrative deletion removes owned vehicles and tokens in
//! the same transaction as the account row.

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Registration, User, Username};

use super::models::{NewUserRow, UserRow};
use super::password::hash_password;
use super::pool::{DbPool, PoolError};
use super::schema::{auth_tokens, users, vehicles};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain user persistence errors.
fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to domain user persistence errors.
fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
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
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserPersistenceError::DuplicateUsername
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        _ => UserPersistenceError::query("database error"),
    }
}

/// Convert a database row to a domain user.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    Username::new(row.username)
        .map(|username| User::new(row.id, username))
        .map_err(|err| UserPersistenceError::query(format!("stored username invalid: {err}")))
}

#[async_trait::async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, registration: &Registration) -> Result<User, UserPersistenceError> {
        let password_hash =
            hash_password(registration.password()).map_err(UserPersistenceError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: UserRow = diesel::insert_into(users::table)
            .values(&NewUserRow {
                username: registration.username().as_ref(),
                password_hash: &password_hash,
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(row)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn delete(&self, id: i32) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (dependents, deleted) = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let dependents =
                        diesel::delete(vehicles::table.filter(vehicles::user_id.eq(id)))
                            .execute(conn)
                            .await?;
                    diesel::delete(auth_tokens::table.filter(auth_tokens::user_id.eq(id)))
                        .execute(conn)
                        .await?;
                    let deleted = diesel::delete(users::table.filter(users::id.eq(id)))
                        .execute(conn)
                        .await?;
                    Ok((dependents, deleted))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        if deleted > 0 {
            debug!(user_id = id, dependents, "user deleted with owned vehicles");
        }
        Ok(deleted > 0)
    }
}
