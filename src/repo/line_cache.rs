use log::{debug, info};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, SelectModel, TransactionTrait,
};

use crate::entities::line::{self, Column, Entity};
use crate::error::{CacheError, CacheResult};
use crate::model::{self, Line, LineKey, StoredLineKey};
use crate::region::Region;
use crate::repo::scan::{Scan, DEFAULT_PAGE_SIZE};

pub type LineScan<'db> = Scan<'db, SelectModel<line::Model>, Line>;

/// Repository over the `lines` table.
#[derive(Clone)]
pub struct LineCache {
    db: DatabaseConnection,
}

impl LineCache {
    pub fn new(db: DatabaseConnection) -> LineCache {
        LineCache { db }
    }

    /// Inserts the station or returns the existing row with the same identity.
    ///
    /// On conflict `updated_at` is refreshed, and `station_order` is
    /// overwritten when one is given.
    pub async fn upsert(&self, key: &LineKey, station_order: Option<i32>) -> CacheResult<Line> {
        let stored_key = key.encode()?;
        let row = stored_key.clone().into_active_model(station_order, model::now());

        let mut on_conflict = identity_conflict();
        match station_order {
            Some(_) => on_conflict.update_columns([Column::StationOrder, Column::UpdatedAt]),
            None => on_conflict.update_column(Column::UpdatedAt),
        };

        let txn = self.db.begin().await?;
        Entity::insert(row)
            .on_conflict(on_conflict)
            .exec_without_returning(&txn)
            .await?;
        let stored = select_identity(&stored_key)
            .one(&txn)
            .await?
            .ok_or_else(|| CacheError::InvalidData(format!("upserted line {key:?} not found")))?;
        txn.commit().await?;

        debug!("upserted line {} ({:?})", stored.id, key);
        Line::try_from(stored)
    }

    /// Stations of one line in travel order. Rows without an order come
    /// last, ties keep insertion order.
    pub async fn find_by_line(&self, prefecture: &str, line_name: &str) -> CacheResult<Vec<Line>> {
        let rows = Entity::find()
            .filter(Column::Prefecture.eq(prefecture))
            .filter(Column::LineName.eq(line_name))
            .order_by(Expr::col(Column::StationOrder).is_null(), Order::Asc)
            .order_by_asc(Column::StationOrder)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        rows.into_iter().map(Line::try_from).collect()
    }

    pub fn find_by_prefecture(&self, prefecture: &str) -> LineScan<'_> {
        self.scan_by_prefecture(prefecture, DEFAULT_PAGE_SIZE)
    }

    /// Like `find_by_prefecture` with an explicit page size. A size of 0 is
    /// read as 1.
    pub fn scan_by_prefecture(&self, prefecture: &str, page_size: u64) -> LineScan<'_> {
        let pager = Entity::find()
            .filter(Column::Prefecture.eq(prefecture))
            .order_by_asc(Column::Id)
            .paginate(&self.db, page_size.max(1));
        Scan::new(pager)
    }

    pub async fn delete(&self, id: i32) -> CacheResult<bool> {
        let result = Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    /// Distinct line names cached for a prefecture, sorted.
    pub async fn line_names(&self, prefecture: &str) -> CacheResult<Vec<String>> {
        let names = Entity::find()
            .select_only()
            .column(Column::LineName)
            .filter(Column::Prefecture.eq(prefecture))
            .distinct()
            .order_by_asc(Column::LineName)
            .into_tuple::<String>()
            .all(&self.db)
            .await?;
        Ok(names)
    }

    pub async fn stations(&self, prefecture: &str, line_name: &str) -> CacheResult<Vec<String>> {
        let stations = self
            .find_by_line(prefecture, line_name)
            .await?
            .into_iter()
            .filter_map(|line| line.station)
            .collect();
        Ok(stations)
    }

    /// Records a line's stations in travel order, keeping stations that are
    /// already cached. New stations are appended after the line's highest
    /// stored order. Returns how many stations were new.
    pub async fn add_line(
        &self,
        region: Region,
        prefecture: &str,
        line_name: &str,
        stations: &[&str],
    ) -> CacheResult<usize> {
        let now = model::now();
        let txn = self.db.begin().await?;

        let last_order = Entity::find()
            .select_only()
            .column_as(Column::StationOrder.max(), "last_order")
            .filter(Column::Region.eq(region.label()))
            .filter(Column::Prefecture.eq(prefecture))
            .filter(Column::LineName.eq(line_name))
            .into_tuple::<Option<i32>>()
            .one(&txn)
            .await?
            .flatten();
        let mut next_order = last_order.map_or(0, |order| order + 1);

        let mut added = 0;
        for station in stations {
            let row = LineKey::new(region, prefecture, line_name)
                .station(*station)
                .encode()?
                .into_active_model(Some(next_order), now);
            let inserted = Entity::insert(row)
                .on_conflict(identity_conflict().do_nothing().to_owned())
                .exec_without_returning(&txn)
                .await?;
            if inserted > 0 {
                next_order += 1;
                added += 1;
            }
        }
        txn.commit().await?;

        if added > 0 {
            info!("added {added} stations to {line_name}");
        }
        Ok(added)
    }

    pub async fn has_line(&self, prefecture: &str, line_name: &str) -> CacheResult<bool> {
        let count = Entity::find()
            .filter(Column::Prefecture.eq(prefecture))
            .filter(Column::LineName.eq(line_name))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}

fn identity_conflict() -> OnConflict {
    OnConflict::columns([
        Column::Region,
        Column::Prefecture,
        Column::LineName,
        Column::Station,
    ])
}

fn select_identity(key: &StoredLineKey) -> Select<Entity> {
    Entity::find()
        .filter(Column::Region.eq(key.region))
        .filter(Column::Prefecture.eq(key.prefecture.as_str()))
        .filter(Column::LineName.eq(key.line_name.as_str()))
        .filter(Column::Station.eq(key.station.as_str()))
}
