pub mod line_cache;
pub mod location_cache;
pub mod metadata_store;
pub mod scan;

pub use line_cache::{LineCache, LineScan};
pub use location_cache::{LocationCache, LocationScan};
pub use metadata_store::MetadataStore;
pub use scan::Scan;
