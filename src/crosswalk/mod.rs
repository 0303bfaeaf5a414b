mod crosswalk;
mod overlay;
mod summary;
mod validate;
mod weights;

pub use crosswalk::{Crosswalk, CrosswalkRow, WeightedLink};
pub use overlay::{overlay, OverlapFragment, Overlay};
pub use summary::{CrosswalkSummary, HistogramBin, ZoneComplexity};
pub use validate::{validate, ValidationReport, WEIGHT_SUM_TOLERANCE};
pub use weights::{Apportionment, WeightAggregator};
