use crate::config::DatabaseConfig;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Upper bound for the readiness probe, well below any load balancer timeout
const PING_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to create database pool: {0}")]
    PoolCreation(sqlx::Error),

    #[error("Database query error: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Database did not answer within {0:?}")]
    ConnectionTimeout(Duration),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Handle on the shared pool for health probes
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// `SELECT 1`, bounded by [`PING_TIMEOUT`]
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        tokio::time::timeout(PING_TIMEOUT, sqlx::query("SELECT 1").execute(&self.pool))
            .await
            .map_err(|_| DatabaseError::ConnectionTimeout(PING_TIMEOUT))??;
        Ok(())
    }
}

/// Open the Postgres pool and make sure one connection actually works.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .test_before_acquire(config.test_before_acquire)
        .connect(&config.url)
        .await
        .map_err(DatabaseError::PoolCreation)?;

    debug!(max_connections = config.max_connections, "Pool created, probing connection");

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(DatabaseError::PoolCreation)?;

    Ok(pool)
}

/// Apply pending migrations from `migrations_path` (default `./migrations`).
///
/// The directory is read at runtime so the binary can ship with SQL files
/// next to it.
pub async fn run_migrations(
    pool: &PgPool,
    migrations_path: Option<&str>,
) -> Result<(), DatabaseError> {
    let path = migrations_path.unwrap_or("./migrations");
    let migrator = Migrator::new(Path::new(path)).await?;

    info!("Applying up to {} migrations from {}", migrator.iter().count(), path);
    migrator.run(pool).await?;

    Ok(())
}
