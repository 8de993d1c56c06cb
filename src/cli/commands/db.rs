use crate::config::{AppConfig, StoreBackend};
use crate::database::DatabaseManager;

pub async fn migrate(config: &AppConfig) -> anyhow::Result<()> {
    if config.database.backend == StoreBackend::Memory {
        anyhow::bail!("STORE_BACKEND=memory has no schema to migrate");
    }

    let pool = DatabaseManager::connect(&config.database).await?;
    DatabaseManager::ensure_schema(&pool).await?;
    pool.close().await;
    Ok(())
}
