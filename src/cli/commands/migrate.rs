use tracing::info;

use crate::config::config;
use crate::database::DatabaseManager;

pub async fn handle() -> anyhow::Result<()> {
    let pool = DatabaseManager::open(&config().database).await?;
    pool.close().await;
    info!("Migrations applied to {}", config().database.url);
    Ok(())
}
