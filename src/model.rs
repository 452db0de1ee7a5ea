//! Domain records handed out by the repositories.
//!
//! Absent optional text is `None` here and `''` in storage; see the
//! migration for why.

use sea_orm::prelude::DateTime;
use sea_orm::ActiveValue;

use crate::entities::{line, location, metadata};
use crate::error::{CacheError, CacheResult};
use crate::region::Region;

pub const PREFECTURE_MAX_LEN: usize = 20;
pub const CITY_MAX_LEN: usize = 50;
pub const WARD_MAX_LEN: usize = 50;
pub const TOWN_MAX_LEN: usize = 100;
pub const LINE_NAME_MAX_LEN: usize = 100;
pub const STATION_MAX_LEN: usize = 50;
pub const METADATA_KEY_MAX_LEN: usize = 50;

/// Unique identity of a location row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationKey {
    pub region: Region,
    pub prefecture: String,
    pub city: Option<String>,
    pub ward: Option<String>,
    pub town: Option<String>,
}

impl LocationKey {
    pub fn new(region: Region, prefecture: impl Into<String>) -> Self {
        LocationKey {
            region,
            prefecture: prefecture.into(),
            city: None,
            ward: None,
            town: None,
        }
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn ward(mut self, ward: impl Into<String>) -> Self {
        self.ward = Some(ward.into());
        self
    }

    pub fn town(mut self, town: impl Into<String>) -> Self {
        self.town = Some(town.into());
        self
    }

    /// Validates the key and converts it into its stored column values.
    pub(crate) fn encode(&self) -> CacheResult<StoredLocationKey> {
        Ok(StoredLocationKey {
            region: self.region.label(),
            prefecture: required("prefecture", &self.prefecture, PREFECTURE_MAX_LEN)?,
            city: optional("city", self.city.as_deref(), CITY_MAX_LEN)?,
            ward: optional("ward", self.ward.as_deref(), WARD_MAX_LEN)?,
            town: optional("town", self.town.as_deref(), TOWN_MAX_LEN)?,
        })
    }
}

/// A `LocationKey` as it appears in the unique index.
#[derive(Debug, Clone)]
pub(crate) struct StoredLocationKey {
    pub region: &'static str,
    pub prefecture: String,
    pub city: String,
    pub ward: String,
    pub town: String,
}

impl StoredLocationKey {
    pub(crate) fn into_active_model(self, now: DateTime) -> location::ActiveModel {
        location::ActiveModel {
            id: ActiveValue::NotSet,
            region: ActiveValue::Set(self.region.to_string()),
            prefecture: ActiveValue::Set(self.prefecture),
            city: ActiveValue::Set(self.city),
            ward: ActiveValue::Set(self.ward),
            town: ActiveValue::Set(self.town),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: i32,
    pub region: Region,
    pub prefecture: String,
    pub city: Option<String>,
    pub ward: Option<String>,
    pub town: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl TryFrom<location::Model> for Location {
    type Error = CacheError;

    fn try_from(model: location::Model) -> Result<Self, Self::Error> {
        Ok(Location {
            id: model.id,
            region: parse_region(&model.region)?,
            prefecture: model.prefecture,
            city: absent_if_empty(model.city),
            ward: absent_if_empty(model.ward),
            town: absent_if_empty(model.town),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Unique identity of a line row. A key without station names the line itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub region: Region,
    pub prefecture: String,
    pub line_name: String,
    pub station: Option<String>,
}

impl LineKey {
    pub fn new(region: Region, prefecture: impl Into<String>, line_name: impl Into<String>) -> Self {
        LineKey {
            region,
            prefecture: prefecture.into(),
            line_name: line_name.into(),
            station: None,
        }
    }

    pub fn station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }

    pub(crate) fn encode(&self) -> CacheResult<StoredLineKey> {
        Ok(StoredLineKey {
            region: self.region.label(),
            prefecture: required("prefecture", &self.prefecture, PREFECTURE_MAX_LEN)?,
            line_name: required("line_name", &self.line_name, LINE_NAME_MAX_LEN)?,
            station: optional("station", self.station.as_deref(), STATION_MAX_LEN)?,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct StoredLineKey {
    pub region: &'static str,
    pub prefecture: String,
    pub line_name: String,
    pub station: String,
}

impl StoredLineKey {
    pub(crate) fn into_active_model(self, station_order: Option<i32>, now: DateTime) -> line::ActiveModel {
        line::ActiveModel {
            id: ActiveValue::NotSet,
            region: ActiveValue::Set(self.region.to_string()),
            prefecture: ActiveValue::Set(self.prefecture),
            line_name: ActiveValue::Set(self.line_name),
            station: ActiveValue::Set(self.station),
            station_order: ActiveValue::Set(station_order),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub id: i32,
    pub region: Region,
    pub prefecture: String,
    pub line_name: String,
    pub station: Option<String>,
    pub station_order: Option<i32>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl TryFrom<line::Model> for Line {
    type Error = CacheError;

    fn try_from(model: line::Model) -> Result<Self, Self::Error> {
        Ok(Line {
            id: model.id,
            region: parse_region(&model.region)?,
            prefecture: model.prefecture,
            line_name: model.line_name,
            station: absent_if_empty(model.station),
            station_order: model.station_order,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub key: String,
    pub value: Option<String>,
    pub updated_at: DateTime,
}

impl From<metadata::Model> for MetadataEntry {
    fn from(model: metadata::Model) -> Self {
        MetadataEntry {
            key: model.key,
            value: model.value,
            updated_at: model.updated_at,
        }
    }
}

/// Current time as written to `created_at` / `updated_at`.
pub(crate) fn now() -> DateTime {
    chrono::Utc::now().naive_utc()
}

pub(crate) fn required(field: &str, value: &str, max_len: usize) -> CacheResult<String> {
    if value.is_empty() {
        return Err(CacheError::ConstraintViolation(format!("{field} must not be empty")));
    }
    bounded(field, value, max_len)
}

/// Encodes an optional part of a unique key into its stored form.
pub(crate) fn optional(field: &str, value: Option<&str>, max_len: usize) -> CacheResult<String> {
    match value {
        Some(value) => bounded(field, value, max_len),
        None => Ok(String::new()),
    }
}

fn bounded(field: &str, value: &str, max_len: usize) -> CacheResult<String> {
    let len = value.chars().count();
    if len > max_len {
        return Err(CacheError::ConstraintViolation(format!(
            "{field} is {len} characters long, at most {max_len} allowed"
        )));
    }
    Ok(value.to_string())
}

fn absent_if_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_region(label: &str) -> CacheResult<Region> {
    label
        .parse()
        .map_err(|err| CacheError::InvalidData(format!("{err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_optional_parts_are_stored_as_absent() {
        let key = LocationKey::new(Region::Kinki, "大阪府").city("");
        let stored = key.encode().unwrap();
        assert_eq!(stored.region, "近畿圏");
        assert_eq!(stored.city, "");
        assert_eq!(stored.ward, "");
    }

    #[test]
    fn rejects_empty_required_fields() {
        let err = LineKey::new(Region::Kinki, "大阪府", "").encode().unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn rejects_values_longer_than_the_column() {
        let long_town = "町".repeat(TOWN_MAX_LEN + 1);
        let err = LocationKey::new(Region::Kinki, "大阪府")
            .town(long_town)
            .encode()
            .unwrap_err();
        assert!(err.is_constraint_violation());

        let exact = "町".repeat(TOWN_MAX_LEN);
        assert!(LocationKey::new(Region::Kinki, "大阪府")
            .town(exact)
            .encode()
            .is_ok());
    }

    #[test]
    fn unknown_region_label_is_invalid_data() {
        let model = location::Model {
            id: 1,
            region: "北陸".to_string(),
            prefecture: "富山県".to_string(),
            city: String::new(),
            ward: String::new(),
            town: String::new(),
            created_at: now(),
            updated_at: now(),
        };
        assert!(matches!(Location::try_from(model), Err(CacheError::InvalidData(_))));
    }
}
