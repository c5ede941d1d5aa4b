pub mod models;
pub mod repositories;
pub mod seed;

use std::time::Duration;

use anyhow::Context;
use sqlx::{PgPool, Postgres, migrate::MigrateDatabase, postgres::PgPoolOptions};

/// Tables the API needs before it can serve traffic.
pub const REQUIRED_TABLES: &[&str] = &[
    "users",
    "questions",
    "attempts",
    "mastery",
    "topics",
    "topic_dependencies",
    "test_results",
    "test_result_details",
];

/// Create a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("failed to connect to database")?;

    Ok(pool)
}

/// Create a pool that opens connections on first use.
///
/// Never fails because the server is down, so a process can start while the
/// database is unavailable and report it through readiness checks instead.
/// Queries wait at most `acquire_timeout` for a connection.
pub fn create_lazy_pool(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect_lazy(database_url)
        .context("invalid database URL")?;

    Ok(pool)
}

/// Create the database named in `database_url` if it does not exist yet.
pub async fn ensure_database(database_url: &str) -> anyhow::Result<()> {
    let exists = Postgres::database_exists(database_url)
        .await
        .context("failed to check database existence")?;
    if !exists {
        tracing::info!("Database does not exist, creating it");
        Postgres::create_database(database_url)
            .await
            .context("failed to create database")?;
    }

    Ok(())
}

/// Run migrations bundled at compile time from this crate's `migrations/` folder.
///
/// Safe to run repeatedly: applied migrations are skipped.
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!()
        .run(pool)
        .await
        .context("failed to run migrations")?;

    Ok(())
}

/// Return the required tables that are absent from the current schema.
///
/// An empty vector means the schema is ready.
pub async fn missing_tables(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    let present: Vec<String> = sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT table_name::text
            FROM information_schema.tables
            WHERE table_schema = current_schema()
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(REQUIRED_TABLES
        .iter()
        .filter(|table| !present.iter().any(|p| p == *table))
        .map(|table| (*table).to_string())
        .collect())
}
