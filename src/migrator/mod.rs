use sea_orm_migration::prelude::*;
use sea_orm_migration::MigratorTrait;

pub(crate) mod m20260122_000001_create_cache_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260122_000001_create_cache_tables::Migration),
        ]
    }
}
