//! Orchid API server

use orchid_api::{create_router, state::AppState, store};
use orchid_core::config::AppConfig;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration: TOML file if pointed at one, env otherwise
    let config = match std::env::var("ORCHID_CONFIG") {
        Ok(path) => AppConfig::from_file(path)?,
        Err(_) => AppConfig::from_env().unwrap_or_default(),
    };

    // RUST_LOG wins; the config's level is the fallback
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "orchid_api={0},tower_http={0}",
            config.logging.level
        ))
    });
    if config.logging.json_format {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.database.pool_size)
        .connect(&config.database.url)
        .await?;

    store::seed::run(&pool).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, pool));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Orchid API server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);
    tracing::info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
