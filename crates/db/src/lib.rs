//! Postgres persistence layer for the publication platform.
//!
//! Exposes `FromRow` entity models and zero-sized repository structs whose
//! async methods take `&PgPool` as the first argument. Each tenant gets its
//! own pool; nothing in this crate caches connections process-wide.

pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Create a small pool for a single tenant pass.
///
/// Tenant pools live only for the duration of one reconciliation pass, so
/// they stay deliberately small.
pub async fn create_tenant_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(4)
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}
