mod common;

use reins_cache::{schema, CacheError, Migrator};
use sea_orm::ConnectionTrait;
use sea_orm_migration::{MigratorTrait, SchemaManager};

#[tokio::test]
async fn apply_creates_all_tables() {
    let db = common::empty_db().await;
    assert!(!schema::is_applied(&db).await.unwrap());

    schema::apply(&db).await.unwrap();

    let manager = SchemaManager::new(&db);
    for table in schema::TABLES {
        assert!(manager.has_table(table).await.unwrap(), "table {table} does not exist");
    }
    assert!(schema::is_applied(&db).await.unwrap());
}

#[tokio::test]
async fn apply_creates_the_drilldown_indexes() {
    let db = common::cache_db().await;
    let manager = SchemaManager::new(&db);

    for index in [
        "idx_locations_region",
        "idx_locations_prefecture",
        "idx_locations_prefecture_city",
        "idx_locations_prefecture_city_ward",
        "uq_locations_identity",
    ] {
        assert!(manager.has_index("locations", index).await.unwrap(), "index {index} missing");
    }
    for index in [
        "idx_lines_region",
        "idx_lines_prefecture",
        "idx_lines_line_name",
        "idx_lines_prefecture_line_name",
        "uq_lines_identity",
    ] {
        assert!(manager.has_index("lines", index).await.unwrap(), "index {index} missing");
    }
}

#[tokio::test]
async fn repeated_apply_fails_with_schema_error() {
    let db = common::cache_db().await;

    let err = schema::apply(&db).await.unwrap_err();
    assert!(matches!(err, CacheError::Schema(_)), "unexpected error: {err}");
    assert!(schema::is_applied(&db).await.unwrap());
}

#[tokio::test]
async fn failed_apply_leaves_no_tables_behind() {
    let db = common::empty_db().await;
    db.execute_unprepared("CREATE TABLE lines (id INTEGER PRIMARY KEY);")
        .await
        .unwrap();

    let err = schema::apply(&db).await.unwrap_err();
    assert!(matches!(err, CacheError::Schema(_)));

    let manager = SchemaManager::new(&db);
    assert!(!manager.has_table("locations").await.unwrap());
    assert!(!manager.has_table("metadata").await.unwrap());
}

#[tokio::test]
async fn apply_revert_apply_round_trip() {
    let db = common::empty_db().await;

    schema::apply(&db).await.unwrap();
    schema::revert(&db).await.unwrap();
    assert!(!schema::is_applied(&db).await.unwrap());

    let manager = SchemaManager::new(&db);
    for table in schema::TABLES {
        assert!(!manager.has_table(table).await.unwrap(), "table {table} survived revert");
    }

    schema::apply(&db).await.unwrap();
    assert!(schema::is_applied(&db).await.unwrap());
}

#[tokio::test]
async fn revert_tolerates_missing_tables() {
    let db = common::empty_db().await;
    schema::revert(&db).await.unwrap();
    schema::revert(&db).await.unwrap();
}

#[tokio::test]
async fn migrator_applies_and_reverts_the_schema() {
    let db = common::empty_db().await;

    Migrator::up(&db, None).await.unwrap();
    assert!(schema::is_applied(&db).await.unwrap());
    assert!(Migrator::get_pending_migrations(&db).await.unwrap().is_empty());

    // Already at the latest version, so this is a no-op rather than an error.
    Migrator::up(&db, None).await.unwrap();

    Migrator::down(&db, None).await.unwrap();
    assert!(!schema::is_applied(&db).await.unwrap());

    Migrator::refresh(&db).await.unwrap();
    assert!(schema::is_applied(&db).await.unwrap());
}
