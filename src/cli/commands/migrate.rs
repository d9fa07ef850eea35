use serde_json::json;

use crate::cli::{output::output_success, OutputFormat};
use crate::config;
use crate::database::DatabaseManager;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let url = DatabaseManager::database_url()?;
    tracing::info!("Migrating {}", DatabaseManager::redacted(&url));

    let pool = DatabaseManager::connect(&url, &config::config().database).await?;
    DatabaseManager::migrate(&pool).await?;
    pool.close().await;

    output_success(
        &output_format,
        "Migrations applied",
        Some(json!({ "database": DatabaseManager::redacted(&url) })),
    )
}
