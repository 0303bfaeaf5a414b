use std::{fs, path::{Path, PathBuf}};

use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, LayerKind},
    geom::Crs,
};

/// Default minimum raw weight a (zone, tract) pair needs to be kept.
pub const DEFAULT_THRESHOLD: f64 = 0.01;

/// Default target reference: NAD83 / New York Long Island (ftUS).
pub const DEFAULT_TARGET_CRS: &str = "EPSG:2263";

/// Where to find one input layer and which attribute identifies its features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub path: PathBuf,
    pub id_field: String,
    /// Optional human-readable label field (zones only).
    #[serde(default)]
    pub name_field: Option<String>,
    /// Source reference of the layer; read from the `.prj` sidecar when unset.
    #[serde(default)]
    pub crs: Option<String>,
}

impl LayerConfig {
    pub fn zones() -> Self {
        Self {
            path: "taxi_zones/taxi_zones.shp".into(),
            id_field: "LocationID".into(),
            name_field: Some("zone".into()),
            crs: None,
        }
    }

    pub fn tracts() -> Self {
        Self {
            path: "nyc_tracts/nyct2020.shp".into(),
            id_field: "BoroCT2020".into(),
            name_field: None,
            crs: None,
        }
    }
}

/// Everything a crosswalk run needs. Passed explicitly into each stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrosswalkConfig {
    pub zones: LayerConfig,
    pub tracts: LayerConfig,
    pub output: PathBuf,
    pub threshold: f64,
    pub target_crs: String,
}

impl Default for CrosswalkConfig {
    fn default() -> Self {
        Self {
            zones: LayerConfig::zones(),
            tracts: LayerConfig::tracts(),
            output: "nyc_zone_tract_crosswalk_FINAL.csv".into(),
            threshold: DEFAULT_THRESHOLD,
            target_crs: DEFAULT_TARGET_CRS.into(),
        }
    }
}

impl CrosswalkConfig {
    /// Read a JSON config file. Missing keys fall back to defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        serde_json::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Check parameters before any input is touched, returning the parsed target reference.
    pub fn validate(&self) -> Result<Crs, ConfigError> {
        if !self.threshold.is_finite() || !(0.0..1.0).contains(&self.threshold) {
            return Err(ConfigError::Threshold(self.threshold));
        }
        if self.zones.id_field.trim().is_empty() {
            return Err(ConfigError::EmptyField(LayerKind::Zones));
        }
        if self.tracts.id_field.trim().is_empty() {
            return Err(ConfigError::EmptyField(LayerKind::Tracts));
        }

        let target = Crs::parse(&self.target_crs)?;
        if target.is_geographic() {
            return Err(ConfigError::GeographicTarget(self.target_crs.clone()));
        }
        Ok(target)
    }
}
