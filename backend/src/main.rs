//! Backend entry-point: wires persistence adapters to the REST surface.

use std::sync::Arc;

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{
    DbPool, DieselBrandRepository, DieselSegmentRepository, DieselTokenAuthenticator,
    DieselUserRepository, DieselVehicleRepository, PoolConfig,
};
use backend::server::{self, ServerConfig};

/// Embedded SQL migrations applied at startup.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

fn run_migrations(database_url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| format!("failed to connect for migrations: {err}"))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| format!("failed to run migrations: {err}"))?;
    info!(count = applied.len(), "migrations applied");
    Ok(())
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_env().map_err(std::io::Error::other)?;
    run_migrations(config.database_url()).map_err(std::io::Error::other)?;

    let pool = DbPool::new(PoolConfig::new(config.database_url()))
        .await
        .map_err(std::io::Error::other)?;

    let state = HttpState {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        tokens: Arc::new(DieselTokenAuthenticator::new(pool.clone())),
        segments: Arc::new(DieselSegmentRepository::new(pool.clone())),
        brands: Arc::new(DieselBrandRepository::new(pool.clone())),
        vehicles: Arc::new(DieselVehicleRepository::new(pool)),
    };

    info!(addr = %config.bind_addr(), "starting http server");
    server::run(config, state).await
}
