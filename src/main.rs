use anyhow::Context;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use gram_api::auth::TokenService;
use gram_api::database::DatabaseManager;
use gram_api::routes::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gram_api=info,tower_http=info")),
        )
        .init();

    let config = gram_api::config::config();
    tracing::info!("Starting gram-api in {:?} mode", config.environment);

    let tokens = TokenService::from_config(&config.security).context("JWT_SECRET must be set")?;
    let pool = DatabaseManager::connect(&config.database).await?;
    if config.database.auto_migrate {
        DatabaseManager::migrate(&pool).await?;
    }

    let app = app(AppState::with_pool(pool, tokens), config);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("gram-api listening on http://{}", bind_addr);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutting down");
}
