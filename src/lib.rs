//! Storage layer for the REINS option caches: the `locations`, `lines` and
//! `metadata` tables, their schema, and one repository per table.

pub mod config;
pub mod entities;
pub mod error;
pub mod migrator;
pub mod model;
pub mod region;
pub mod repo;
pub mod schema;
pub mod stats;
pub mod summary;

pub use config::{DatabaseConfig, Environment};
pub use error::{CacheError, CacheResult};
pub use migrator::Migrator;
pub use model::{Line, LineKey, Location, LocationKey, MetadataEntry};
pub use region::Region;
pub use repo::{LineCache, LocationCache, MetadataStore, Scan};
pub use stats::CacheStats;
