use anyhow::Context;
use tracing_subscriber::EnvFilter;

use focus_api::auth::build_verifier;
use focus_api::config;
use focus_api::database::DatabaseManager;
use focus_api::router;
use focus_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and auth settings
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config();
    tracing::info!("Starting focus API in {:?} mode", config.environment);

    let url = DatabaseManager::database_url()?;
    let pool = DatabaseManager::connect(&url, &config.database)
        .await
        .with_context(|| format!("connecting to {}", DatabaseManager::redacted(&url)))?;

    if config.database.run_migrations {
        DatabaseManager::migrate(&pool).await?;
    }

    let verifier = build_verifier(&config.auth).context("configuring token verification")?;
    let app = router::app(AppState::new(pool, verifier), &config.security);

    let bind_addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Focus API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
