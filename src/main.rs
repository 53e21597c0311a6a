use std::sync::Arc;

use friend_recs::{
    config::Config,
    db::create_pool,
    routes::{create_router, AppState},
    services::{build_recommendation_service, providers::PgSocialStore},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("friend_recs=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url, config.db_max_connections).await?;
    let store = Arc::new(PgSocialStore::new(pool));

    // Registry problems are fatal: refuse to start rather than serve degraded results
    let service = build_recommendation_service(&config, store.clone(), store)?;
    let app = create_router(Arc::new(AppState::new(service)));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
