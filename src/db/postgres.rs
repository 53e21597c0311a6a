use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool};

/// Schema migrations embedded at compile time from `migrations/`
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse and applies any
/// pending schema migrations before the pool is handed out.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    MIGRATOR.run(&pool).await?;
    tracing::info!(max_connections, "Database pool ready, migrations applied");

    Ok(pool)
}
