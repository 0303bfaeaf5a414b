#![doc = "Taxi zone to census tract crosswalk"]
mod common;
mod config;
mod crosswalk;
mod error;
mod geom;
mod io;
mod layer;
mod pipeline;

#[doc(inline)]
pub use config::{CrosswalkConfig, LayerConfig, DEFAULT_TARGET_CRS, DEFAULT_THRESHOLD};

#[doc(inline)]
pub use crosswalk::{
    overlay, validate, Apportionment, Crosswalk, CrosswalkRow, CrosswalkSummary, HistogramBin,
    OverlapFragment, Overlay, ValidationReport, WeightAggregator, WeightedLink, ZoneComplexity,
    WEIGHT_SUM_TOLERANCE,
};

#[doc(inline)]
pub use error::{
    ConfigError, CrosswalkError, GeometryError, GeometryIssue, LayerKind, LoadError, WriteError,
    ZoneDroppedWarning,
};

#[doc(inline)]
pub use geom::Crs;

#[doc(inline)]
pub use io::csv::{read_crosswalk, write_crosswalk};

#[doc(inline)]
pub use layer::{load_layers, read_zone_attributes, LoadedLayers, Tract, TractId, Zone, ZoneFeature, ZoneId, ZoneLayer};

#[doc(inline)]
pub use pipeline::{build_crosswalk, run_pipeline, CrosswalkReport};
