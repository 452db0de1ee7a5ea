//! Direct, transactional application of the cache schema.
//!
//! The versioned `Migrator` runs the same DDL and records it in its own
//! bookkeeping table. These helpers skip the bookkeeping and are meant for
//! callers that manage schema state themselves (tests, throwaway databases).
//! Schema changes are assumed to run while nothing else touches the tables.

use log::info;
use sea_orm::{DatabaseConnection, TransactionTrait};
use sea_orm_migration::{MigrationTrait, SchemaManager};

use crate::error::{CacheError, CacheResult};
use crate::migrator::m20260122_000001_create_cache_tables::Migration;

pub const TABLES: [&str; 3] = ["locations", "lines", "metadata"];

/// Creates all three tables with their indexes, or none of them.
///
/// Fails if any of the tables already exists.
pub async fn apply(db: &DatabaseConnection) -> CacheResult<()> {
    let txn = db.begin().await.map_err(CacheError::Schema)?;
    Migration
        .up(&SchemaManager::new(&txn))
        .await
        .map_err(CacheError::Schema)?;
    txn.commit().await.map_err(CacheError::Schema)?;

    info!("cache schema applied");
    Ok(())
}

/// Drops `metadata`, `lines` and `locations`, skipping the ones that are absent.
pub async fn revert(db: &DatabaseConnection) -> CacheResult<()> {
    let txn = db.begin().await.map_err(CacheError::Schema)?;
    Migration
        .down(&SchemaManager::new(&txn))
        .await
        .map_err(CacheError::Schema)?;
    txn.commit().await.map_err(CacheError::Schema)?;

    info!("cache schema reverted");
    Ok(())
}

pub async fn is_applied(db: &DatabaseConnection) -> CacheResult<bool> {
    let manager = SchemaManager::new(db);
    for table in TABLES {
        if !manager.has_table(table).await.map_err(CacheError::Schema)? {
            return Ok(false);
        }
    }
    Ok(true)
}
