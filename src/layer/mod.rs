mod id;
mod read;
mod tract;
mod zone;

pub use id::{TractId, ZoneId};
pub use read::{load_layers, read_zone_attributes, LoadedLayers};
pub use tract::Tract;
pub use zone::{Zone, ZoneFeature, ZoneLayer};
