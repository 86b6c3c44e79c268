//! Shared `PostgreSQL` connection pooling and schema bootstrap.
//!
//! Every `PostgreSQL` adapter in the crate accepts a [`PgPool`]; a single pool
//! can back the application registry, plan registry, task ledger, and group
//! directory at once.

use crate::config::DatabaseConfig;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use std::time::Duration;
use thiserror::Error;

/// `PostgreSQL` connection pool type shared by all adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// SQL creating every table used by the `PostgreSQL` adapters.
pub const SCHEMA_SQL: &str =
    include_str!("../migrations/2026-10-01-000000_create_taskboard_tables/up.sql");

/// Errors raised while preparing database access.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// No connection URL was configured.
    #[error("database url is not configured")]
    MissingUrl,

    /// The connection pool could not be created.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),

    /// The schema could not be applied.
    #[error("failed to apply schema: {0}")]
    Schema(#[from] diesel::result::Error),
}

/// Builds a connection pool from configuration.
///
/// # Errors
///
/// Returns [`DatabaseError::MissingUrl`] when no URL is configured, or
/// [`DatabaseError::Pool`] when the pool cannot open its first connection
/// within the configured timeout.
pub fn build_pool(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let url = config
        .url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .ok_or(DatabaseError::MissingUrl)?;
    let manager = ConnectionManager::<PgConnection>::new(url);
    let pool = Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(Duration::from_secs(config.connect_timeout_secs))
        .build(manager)?;
    Ok(pool)
}

/// Applies [`SCHEMA_SQL`] on an open connection. The statements are
/// idempotent.
///
/// # Errors
///
/// Returns [`DatabaseError::Schema`] when any statement fails.
pub fn apply_schema(connection: &mut PgConnection) -> Result<(), DatabaseError> {
    connection.batch_execute(SCHEMA_SQL)?;
    Ok(())
}
