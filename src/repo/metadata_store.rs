use log::debug;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait};

use crate::entities::metadata::{self, Column, Entity};
use crate::error::CacheResult;
use crate::model::{self, MetadataEntry, METADATA_KEY_MAX_LEN};

/// Key to text store over the `metadata` table. Last writer wins.
#[derive(Clone)]
pub struct MetadataStore {
    db: DatabaseConnection,
}

impl MetadataStore {
    pub fn new(db: DatabaseConnection) -> MetadataStore {
        MetadataStore { db }
    }

    /// The stored value, or `None` when the key is unset or holds no value.
    pub async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.get_entry(key).await?.and_then(|entry| entry.value))
    }

    pub async fn get_entry(&self, key: &str) -> CacheResult<Option<MetadataEntry>> {
        let entry = Entity::find_by_id(key.to_string()).one(&self.db).await?;
        Ok(entry.map(MetadataEntry::from))
    }

    pub async fn set(&self, key: &str, value: Option<&str>) -> CacheResult<()> {
        let row = metadata::ActiveModel {
            key: ActiveValue::Set(model::required("key", key, METADATA_KEY_MAX_LEN)?),
            value: ActiveValue::Set(value.map(str::to_string)),
            updated_at: ActiveValue::Set(model::now()),
        };

        Entity::insert(row)
            .on_conflict(
                OnConflict::column(Column::Key)
                    .update_columns([Column::Value, Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        debug!("metadata {key} updated");
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> CacheResult<bool> {
        let result = Entity::delete_by_id(key.to_string()).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
