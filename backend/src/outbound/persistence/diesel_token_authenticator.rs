//! Diesel-backed `TokenAuthenticator` adapter.
//!
//! Tokens are 40-character hex keys, one per user, created on first
//! successful login and returned unchanged on every login thereafter.
//! Password verification happens against the stored argon2 hash; unknown
//! usernames and wrong passwords are indistinguishable to the caller.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{TokenAuthenticationError, TokenAuthenticator};
use crate::domain::{AuthToken, LoginCredentials};

use super::models::NewAuthTokenRow;
use super::password::verify_password;
use super::pool::{DbPool, PoolError};
use super::schema::{auth_tokens, users};

/// Number of random bytes behind each token key (40 hex characters).
const TOKEN_KEY_BYTES: usize = 20;

/// Diesel-backed implementation of the `TokenAuthenticator` port.
#[derive(Clone)]
pub struct DieselTokenAuthenticator {
    pool: DbPool,
}

impl DieselTokenAuthenticator {
    /// Create a new authenticator with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn generate_key() -> String {
    let bytes: [u8; TOKEN_KEY_BYTES] = rand::random();
    hex::encode(bytes)
}

/// Map pool errors to domain token authentication errors.
fn map_pool_error(error: PoolError) -> TokenAuthenticationError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            TokenAuthenticationError::connection(message)
        }
    }
}

/// Map Diesel errors to domain token authentication errors.
fn map_diesel_error(error: diesel::result::Error) -> TokenAuthenticationError {
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
            TokenAuthenticationError::connection("database connection error")
        }
        _ => TokenAuthenticationError::query("database error"),
    }
}

#[async_trait::async_trait]
impl TokenAuthenticator for DieselTokenAuthenticator {
    async fn issue(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthToken, TokenAuthenticationError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let stored: Option<(i32, String)> = users::table
            .filter(users::username.eq(credentials.username()))
            .select((users::id, users::password_hash))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let Some((user_id, password_hash)) = stored else {
            return Err(TokenAuthenticationError::InvalidCredentials);
        };
        if !verify_password(&password_hash, credentials.password()) {
            return Err(TokenAuthenticationError::InvalidCredentials);
        }

        let existing: Option<String> = auth_tokens::table
            .filter(auth_tokens::user_id.eq(user_id))
            .select(auth_tokens::key)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        if let Some(key) = existing {
            return Ok(AuthToken::new(key));
        }

        // Two first logins may race; on conflict the re-select below picks up
        // whichever key won.
        let key = generate_key();
        diesel::insert_into(auth_tokens::table)
            .values(&NewAuthTokenRow {
                key: &key,
                user_id,
            })
            .on_conflict(auth_tokens::user_id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let key: String = auth_tokens::table
            .filter(auth_tokens::user_id.eq(user_id))
            .select(auth_tokens::key)
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(AuthToken::new(key))
    }

    async fn resolve(&self, key: &str) -> Result<Option<i32>, TokenAuthenticationError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        auth_tokens::table
            .filter(auth_tokens::key.eq(key))
            .select(auth_tokens::user_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }
}
