pub mod line;
pub mod location;
pub mod metadata;
