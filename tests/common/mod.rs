#![allow(dead_code)]

use reins_cache::{schema, DatabaseConfig, Environment};
use sea_orm::DatabaseConnection;

/// Fresh in-memory database without any tables.
pub async fn empty_db() -> DatabaseConnection {
    DatabaseConfig::resolve(Environment::Test, |_| None)
        .connect()
        .await
        .unwrap()
}

/// Fresh in-memory database with the cache schema applied.
pub async fn cache_db() -> DatabaseConnection {
    let db = empty_db().await;
    schema::apply(&db).await.unwrap();
    db
}
