//! Error and warning types surfaced by the crosswalk pipeline.
//!
//! Fatal problems ([`ConfigError`], [`LoadError`], [`WriteError`]) abort a run and are
//! wrapped by [`CrosswalkError`]. Per-feature problems ([`GeometryError`]) and zones that
//! lose every link to the significance filter ([`ZoneDroppedWarning`]) are collected on the
//! run report instead.

use std::{fmt, io, path::PathBuf};

use polars::error::PolarsError;
use thiserror::Error;

use crate::layer::ZoneId;

/// Top-level error for a crosswalk run.
#[derive(Debug, Error)]
pub enum CrosswalkError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Invalid run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse { path: PathBuf, source: serde_json::Error },

    #[error("significance threshold must be within [0, 1), got {0}")]
    Threshold(f64),

    #[error("unknown coordinate reference {0:?} (use EPSG:<code> from the built-in table or a +proj= string)")]
    UnknownCrs(String),

    #[error("target coordinate reference {0:?} is geographic; areas need a projected reference")]
    GeographicTarget(String),

    #[error("failed to build projection from {definition:?}: {reason}")]
    Projection { definition: String, reason: String },

    #[error("identifier field name for the {0} layer is empty")]
    EmptyField(LayerKind),
}

/// Input layer missing, unreadable, or lacking a required identifier.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("input not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read shapefile {}: {source}", .path.display())]
    Shapefile { path: PathBuf, source: shapefile::Error },

    #[error("{}: record {row} is missing identifier field {field:?}", .path.display())]
    MissingField { path: PathBuf, row: usize, field: String },

    #[error("{}: record {row} has invalid identifier {value:?} in field {field:?}", .path.display())]
    InvalidField { path: PathBuf, row: usize, field: String, value: String },

    #[error("cannot determine coordinate reference of {}; set it explicitly", .path.display())]
    UnknownCrs { path: PathBuf },

    #[error("failed to read crosswalk table {}: {source}", .path.display())]
    Table { path: PathBuf, source: PolarsError },

    #[error("{}: row {row} of the crosswalk table has a null {column:?}", .path.display())]
    NullCell { path: PathBuf, row: usize, column: String },
}

/// Output sink could not be written. No partial output is left behind.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to prepare output directory {}: {source}", .path.display())]
    Directory { path: PathBuf, source: io::Error },

    #[error("failed to encode crosswalk table: {0}")]
    Encode(#[from] PolarsError),

    #[error("failed to stage output for {}: {source}", .path.display())]
    Stage { path: PathBuf, source: io::Error },

    #[error("failed to move output into place at {}: {source}", .path.display())]
    Persist { path: PathBuf, source: io::Error },
}

/// Which input layer a feature came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Zones,
    Tracts,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LayerKind::Zones => "zone",
            LayerKind::Tracts => "tract",
        })
    }
}

/// Reason a feature's geometry cannot take part in the overlay.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryIssue {
    #[error("null geometry")]
    Null,

    #[error("unsupported shape type {0}")]
    Unsupported(String),

    #[error("empty geometry")]
    Empty,

    #[error("non-finite coordinates")]
    NonFinite,

    #[error("zero area")]
    ZeroArea,

    #[error("reprojection failed: {0}")]
    Projection(String),
}

/// A single feature skipped because its geometry cannot be intersected.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{layer} {id}{}: {issue}", .row.map(|r| format!(" (record {r})")).unwrap_or_default())]
pub struct GeometryError {
    pub layer: LayerKind,
    /// Source record, or `None` when the problem shows up after dissolving.
    pub row: Option<usize>,
    pub id: String,
    pub issue: GeometryIssue,
}

impl GeometryError {
    pub(crate) fn zone(row: Option<usize>, id: ZoneId, issue: GeometryIssue) -> Self {
        Self { layer: LayerKind::Zones, row, id: id.to_string(), issue }
    }

    pub(crate) fn tract(row: Option<usize>, id: impl Into<String>, issue: GeometryIssue) -> Self {
        Self { layer: LayerKind::Tracts, row, id: id.into(), issue }
    }
}

/// A zone that ends up with no links after the significance filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneDroppedWarning {
    pub zone_id: ZoneId,
    /// Number of (zone, tract) pairs that overlapped before filtering.
    pub candidates: usize,
    /// Largest raw weight among those pairs, 0.0 when nothing overlapped.
    pub max_raw_weight: f64,
}

impl fmt::Display for ZoneDroppedWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.candidates == 0 {
            write!(f, "zone {} overlaps no tract", self.zone_id)
        } else {
            write!(
                f,
                "zone {} dropped: all {} overlaps below threshold (largest raw weight {:.6})",
                self.zone_id, self.candidates, self.max_raw_weight,
            )
        }
    }
}
