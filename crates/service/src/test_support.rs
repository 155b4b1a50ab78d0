#![cfg(test)]
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

/// Each test gets its own in-memory database with the schema applied, so
/// tests run in parallel without sharing rows.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = models::db::connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
