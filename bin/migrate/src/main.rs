//! Creates the database if needed, applies migrations and loads the seed data.

use zb_api::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    zb_api::tracing::init_tracing(&config.env);

    zb_db::ensure_database(&config.database_url).await?;
    let pool = zb_db::create_pool(&config.database_url, 1).await?;

    zb_db::run_migrations(&pool).await?;
    tracing::info!("Migrations applied");

    let report = zb_db::seed::seed_all(&pool).await?;
    tracing::info!(
        users = report.users,
        questions = report.questions,
        topics = report.topics,
        dependencies = report.dependencies,
        "Seed data loaded"
    );

    let missing = zb_db::missing_tables(&pool).await?;
    if !missing.is_empty() {
        anyhow::bail!("schema still missing tables after migration: {missing:?}");
    }

    pool.close().await;
    Ok(())
}
