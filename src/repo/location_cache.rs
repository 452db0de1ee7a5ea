use log::{debug, info};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, SelectModel, TransactionTrait,
};

use crate::entities::location::{self, Column, Entity};
use crate::error::{CacheError, CacheResult};
use crate::model::{self, Location, LocationKey, StoredLocationKey};
use crate::region::Region;
use crate::repo::scan::{Scan, DEFAULT_PAGE_SIZE};

pub type LocationScan<'db> = Scan<'db, SelectModel<location::Model>, Location>;

/// Repository over the `locations` table.
#[derive(Clone)]
pub struct LocationCache {
    db: DatabaseConnection,
}

impl LocationCache {
    pub fn new(db: DatabaseConnection) -> LocationCache {
        LocationCache { db }
    }

    /// Inserts the location or returns the existing row with the same identity.
    ///
    /// On conflict only `updated_at` changes, so calling this twice yields the
    /// same id.
    pub async fn upsert(&self, key: &LocationKey) -> CacheResult<Location> {
        let stored_key = key.encode()?;
        let row = stored_key.clone().into_active_model(model::now());

        let txn = self.db.begin().await?;
        Entity::insert(row)
            .on_conflict(identity_conflict().update_column(Column::UpdatedAt).to_owned())
            .exec_without_returning(&txn)
            .await?;
        let stored = select_identity(&stored_key)
            .one(&txn)
            .await?
            .ok_or_else(|| CacheError::InvalidData(format!("upserted location {key:?} not found")))?;
        txn.commit().await?;

        debug!("upserted location {} ({:?})", stored.id, key);
        Location::try_from(stored)
    }

    /// Every location of a prefecture in insertion order, fetched lazily.
    pub fn find_by_prefecture(&self, prefecture: &str) -> LocationScan<'_> {
        self.scan_by_prefecture(prefecture, DEFAULT_PAGE_SIZE)
    }

    /// Like `find_by_prefecture` with an explicit page size. A size of 0 is
    /// read as 1.
    pub fn scan_by_prefecture(&self, prefecture: &str, page_size: u64) -> LocationScan<'_> {
        let pager = Entity::find()
            .filter(Column::Prefecture.eq(prefecture))
            .order_by_asc(Column::Id)
            .paginate(&self.db, page_size.max(1));
        Scan::new(pager)
    }

    /// Narrows from prefecture to city to ward. `None` or an empty name
    /// matches every value at that level.
    pub async fn find_by_drilldown(
        &self,
        prefecture: &str,
        city: Option<&str>,
        ward: Option<&str>,
    ) -> CacheResult<Vec<Location>> {
        let query = Entity::find().filter(Column::Prefecture.eq(prefecture));

        narrow(query, city, ward)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Location::try_from)
            .collect()
    }

    /// Returns `false` when no row had this id.
    pub async fn delete(&self, id: i32) -> CacheResult<bool> {
        let result = Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn cities(&self, prefecture: &str) -> CacheResult<Vec<String>> {
        self.distinct(Column::City, Entity::find().filter(Column::Prefecture.eq(prefecture)))
            .await
    }

    pub async fn wards(&self, prefecture: &str, city: &str) -> CacheResult<Vec<String>> {
        let query = Entity::find()
            .filter(Column::Prefecture.eq(prefecture))
            .filter(Column::City.eq(city));
        self.distinct(Column::Ward, query).await
    }

    pub async fn towns(&self, prefecture: &str, city: &str, ward: &str) -> CacheResult<Vec<String>> {
        let query = Entity::find()
            .filter(Column::Prefecture.eq(prefecture))
            .filter(Column::City.eq(city))
            .filter(Column::Ward.eq(ward));
        self.distinct(Column::Town, query).await
    }

    /// Records the wards of a city, returning how many were not cached yet.
    pub async fn add_wards(
        &self,
        region: Region,
        prefecture: &str,
        city: &str,
        wards: &[&str],
    ) -> CacheResult<usize> {
        let keys = wards
            .iter()
            .map(|ward| LocationKey::new(region, prefecture).city(city).ward(*ward))
            .collect::<Vec<_>>();
        let added = self.insert_missing(&keys).await?;
        if added > 0 {
            info!("added {added} wards to {prefecture} {city}");
        }
        Ok(added)
    }

    /// Records the towns of a ward, returning how many were not cached yet.
    pub async fn add_towns(
        &self,
        region: Region,
        prefecture: &str,
        city: &str,
        ward: &str,
        towns: &[&str],
    ) -> CacheResult<usize> {
        let keys = towns
            .iter()
            .map(|town| LocationKey::new(region, prefecture).city(city).ward(ward).town(*town))
            .collect::<Vec<_>>();
        let added = self.insert_missing(&keys).await?;
        if added > 0 {
            info!("added {added} towns to {prefecture} {ward}");
        }
        Ok(added)
    }

    /// Whether anything under this drill-down path has been cached.
    pub async fn is_explored(
        &self,
        region: Region,
        prefecture: &str,
        city: Option<&str>,
        ward: Option<&str>,
    ) -> CacheResult<bool> {
        let query = Entity::find()
            .filter(Column::Region.eq(region.label()))
            .filter(Column::Prefecture.eq(prefecture));
        Ok(narrow(query, city, ward).count(&self.db).await? > 0)
    }

    async fn insert_missing(&self, keys: &[LocationKey]) -> CacheResult<usize> {
        let now = model::now();
        let txn = self.db.begin().await?;
        let mut added = 0;
        for key in keys {
            let inserted = Entity::insert(key.encode()?.into_active_model(now))
                .on_conflict(identity_conflict().do_nothing().to_owned())
                .exec_without_returning(&txn)
                .await?;
            added += inserted as usize;
        }
        txn.commit().await?;
        Ok(added)
    }

    async fn distinct(
        &self,
        column: Column,
        query: Select<Entity>,
    ) -> CacheResult<Vec<String>> {
        let values = query
            .select_only()
            .column(column)
            .filter(column.ne(""))
            .distinct()
            .order_by_asc(column)
            .into_tuple::<String>()
            .all(&self.db)
            .await?;
        Ok(values)
    }
}

fn identity_conflict() -> OnConflict {
    OnConflict::columns([
        Column::Region,
        Column::Prefecture,
        Column::City,
        Column::Ward,
        Column::Town,
    ])
}

fn narrow(mut query: Select<Entity>, city: Option<&str>, ward: Option<&str>) -> Select<Entity> {
    if let Some(city) = city.filter(|city| !city.is_empty()) {
        query = query.filter(Column::City.eq(city));
    }
    if let Some(ward) = ward.filter(|ward| !ward.is_empty()) {
        query = query.filter(Column::Ward.eq(ward));
    }
    query
}

fn select_identity(key: &StoredLocationKey) -> Select<Entity> {
    Entity::find()
        .filter(Column::Region.eq(key.region))
        .filter(Column::Prefecture.eq(key.prefecture.as_str()))
        .filter(Column::City.eq(key.city.as_str()))
        .filter(Column::Ward.eq(key.ward.as_str()))
        .filter(Column::Town.eq(key.town.as_str()))
}
