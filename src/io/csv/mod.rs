//! CSV reading and writing of crosswalk tables.

mod read;
mod write;

pub use read::read_crosswalk;
pub use write::write_crosswalk;

/// Zone identifier column.
pub const ZONE_COLUMN: &str = "LocationID";
/// Tract identifier column.
pub const TRACT_COLUMN: &str = "census_tract_id";
/// Normalized weight column.
pub const WEIGHT_COLUMN: &str = "apportion_weight";
