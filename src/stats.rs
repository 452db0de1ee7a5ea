use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
};

use crate::entities::{line, location};
use crate::error::CacheResult;

/// Row counts across both caches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub prefectures: u64,
    pub wards: u64,
    pub towns: u64,
    pub lines: u64,
    pub stations: u64,
}

impl CacheStats {
    pub async fn collect(db: &DatabaseConnection) -> CacheResult<CacheStats> {
        let prefectures = location::Entity::find()
            .select_only()
            .column(location::Column::Prefecture)
            .distinct()
            .count(db);

        let wards = location::Entity::find()
            .select_only()
            .columns([
                location::Column::Prefecture,
                location::Column::City,
                location::Column::Ward,
            ])
            .filter(location::Column::Ward.ne(""))
            .distinct()
            .count(db);

        let towns = location::Entity::find()
            .filter(location::Column::Town.ne(""))
            .count(db);

        let lines = line::Entity::find()
            .select_only()
            .columns([line::Column::Prefecture, line::Column::LineName])
            .distinct()
            .count(db);

        let stations = line::Entity::find()
            .filter(line::Column::Station.ne(""))
            .count(db);

        let (prefectures, wards, towns, lines, stations) =
            futures::try_join!(prefectures, wards, towns, lines, stations)?;

        Ok(CacheStats {
            prefectures,
            wards,
            towns,
            lines,
            stations,
        })
    }
}
