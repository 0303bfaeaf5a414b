use std::{collections::{BTreeMap, BTreeSet}, path::Path};

use geo::MultiPolygon;
use shapefile::{dbase::Record, Shape};
use tracing::{debug, info, trace};

use crate::{
    common,
    config::{CrosswalkConfig, LayerConfig},
    error::{CrosswalkError, GeometryError, GeometryIssue, LoadError},
    geom::{self, Crs, Reprojector},
    layer::{Tract, TractId, ZoneFeature, ZoneId, ZoneLayer},
};

/// Both input layers in the target reference, ready for the overlay.
#[derive(Debug, Clone)]
pub struct LoadedLayers {
    pub zones: ZoneLayer,
    pub tracts: Vec<Tract>,
    /// Every zone id present in the input, including zones whose geometry was unusable.
    pub input_zone_ids: BTreeSet<ZoneId>,
    /// Features skipped because their geometry cannot be intersected.
    pub skipped: Vec<GeometryError>,
}

impl LoadedLayers {
    /// Build from in-memory features already in a common projected reference.
    pub fn from_features(zones: Vec<ZoneFeature>, tracts: Vec<Tract>) -> Self {
        let input_zone_ids = zones.iter().map(|feature| feature.id).collect();
        let (zones, mut skipped) = ZoneLayer::dissolve(zones);

        let tracts = tracts.into_iter()
            .filter_map(|tract| match geom::polygonal_area(&tract.geometry) {
                Ok(_) => Some(tract),
                Err(issue) => {
                    skipped.push(GeometryError::tract(None, tract.id.as_str(), issue));
                    None
                }
            })
            .collect();

        Self { zones, tracts, input_zone_ids, skipped }
    }

    /// Input zone ids that did not make it into the zone layer.
    pub fn rejected_zone_ids(&self) -> BTreeSet<ZoneId> {
        self.input_zone_ids.iter()
            .copied()
            .filter(|&id| self.zones.get(id).is_none())
            .collect()
    }
}

/// Load, reproject and dissolve the zone and tract layers named in `config`.
///
/// Unreadable inputs and records without an identifier abort the load. Features with
/// unusable geometry are skipped and listed in [`LoadedLayers::skipped`].
pub fn load_layers(config: &CrosswalkConfig) -> Result<LoadedLayers, CrosswalkError> {
    let target = config.validate()?;

    info!("[load] reading zones from {}", config.zones.path.display());
    let (zone_features, mut skipped, input_zone_ids) = read_zone_features(&config.zones, &target)?;

    info!("[load] reading tracts from {}", config.tracts.path.display());
    let (tracts, tract_skipped) = read_tracts(&config.tracts, &target)?;
    skipped.extend(tract_skipped);

    let feature_count = zone_features.len();
    let (zones, dissolve_skipped) = ZoneLayer::dissolve(zone_features);
    skipped.extend(dissolve_skipped);
    info!("[load] dissolved {} zone features into {} zones", feature_count, zones.len());
    for zone in zones.iter() {
        trace!("[load] zone {} ({}): area {:.1}", zone.id, zone.name.unwrap_or("unnamed"), zone.total_area);
    }
    if let Some(bounds) = zones.geoms().bounds() {
        debug!("[load] zone extent in {}: {:?} .. {:?}", target.label(), bounds.min(), bounds.max());
    }

    Ok(LoadedLayers { zones, tracts, input_zone_ids, skipped })
}

/// Read zone ids and (optional) names without touching geometry.
pub fn read_zone_attributes(path: &Path, id_field: &str, name_field: Option<&str>) -> Result<BTreeMap<ZoneId, Option<String>>, LoadError> {
    let mut zones: BTreeMap<ZoneId, Option<String>> = BTreeMap::new();
    for (row, (_, record)) in common::read_shapefile(path)?.into_iter().enumerate() {
        let id = zone_id(&record, path, row, id_field)?;
        let name = name_field.and_then(|field| common::label_field(&record, field));
        let entry = zones.entry(id).or_default();
        if entry.is_none() { *entry = name; }
    }
    Ok(zones)
}

type ZoneFeatures = (Vec<ZoneFeature>, Vec<GeometryError>, BTreeSet<ZoneId>);

fn read_zone_features(layer: &LayerConfig, target: &Crs) -> Result<ZoneFeatures, CrosswalkError> {
    let path = layer.path.as_path();
    let reprojector = layer_reprojector(layer, target)?;

    let mut features = Vec::new();
    let mut skipped = Vec::new();
    let mut ids = BTreeSet::new();
    for (row, (shape, record)) in common::read_shapefile(path)?.into_iter().enumerate() {
        let id = zone_id(&record, path, row, &layer.id_field)?;
        ids.insert(id);
        match project_polygonal(shape, &reprojector) {
            Ok(geometry) => features.push(ZoneFeature {
                id,
                name: layer.name_field.as_deref().and_then(|field| common::label_field(&record, field)),
                geometry,
            }),
            Err(issue) => skipped.push(GeometryError::zone(Some(row), id, issue)),
        }
    }

    Ok((features, skipped, ids))
}

fn read_tracts(layer: &LayerConfig, target: &Crs) -> Result<(Vec<Tract>, Vec<GeometryError>), CrosswalkError> {
    let path = layer.path.as_path();
    let reprojector = layer_reprojector(layer, target)?;

    let mut tracts = Vec::new();
    let mut skipped = Vec::new();
    for (row, (shape, record)) in common::read_shapefile(path)?.into_iter().enumerate() {
        let id = common::text_field(&record, &layer.id_field)
            .map_err(|e| e.at(path, row, &layer.id_field))?;
        match project_polygonal(shape, &reprojector) {
            Ok(geometry) => tracts.push(Tract { id: TractId::new(&id), geometry }),
            Err(issue) => skipped.push(GeometryError::tract(Some(row), id, issue)),
        }
    }

    info!("[load] {} tracts loaded, {} skipped", tracts.len(), skipped.len());
    Ok((tracts, skipped))
}

fn zone_id(record: &Record, path: &Path, row: usize, field: &str) -> Result<ZoneId, LoadError> {
    common::integer_field(record, field)
        .map(ZoneId)
        .map_err(|e| e.at(path, row, field))
}

/// Source reference of a layer: explicit in config, else detected from the `.prj` sidecar.
fn layer_reprojector(layer: &LayerConfig, target: &Crs) -> Result<Reprojector, CrosswalkError> {
    let source = match &layer.crs {
        Some(crs) => Crs::parse(crs)?,
        None => common::read_prj(&layer.path)
            .and_then(|wkt| Crs::from_prj_wkt(&wkt))
            .ok_or_else(|| LoadError::UnknownCrs { path: layer.path.clone() })?,
    };

    let reprojector = Reprojector::new(&source, target)?;
    if reprojector.is_identity() {
        debug!("[load] {} already in {}", layer.path.display(), target.label());
    } else {
        info!("[load] reprojecting {} from {} to {}", layer.path.display(), source.label(), target.label());
    }
    Ok(reprojector)
}

/// Convert, reproject and check one input shape.
fn project_polygonal(shape: Shape, reprojector: &Reprojector) -> Result<MultiPolygon<f64>, GeometryIssue> {
    let shape = common::shape_to_multipolygon(shape)?;
    let projected = reprojector.project(&shape).map_err(GeometryIssue::Projection)?;
    geom::polygonal_area(&projected)?;
    Ok(projected)
}
