//! Seed command - Populates the role/permission catalog.
//!
//! Safe to run repeatedly; everything goes through upsert-by-unique-name.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, Persistence};
use crate::services::{CatalogManager, CatalogService};

/// Execute the seed command
pub async fn execute(config: Config) -> AppResult<()> {
    tracing::info!("Seeding catalog...");

    let db = Database::connect(&config).await;
    let uow = Arc::new(Persistence::new(db.get_connection()));
    let catalog = CatalogManager::new(uow);

    catalog.seed().await?;

    tracing::info!("Seed completed");
    Ok(())
}
