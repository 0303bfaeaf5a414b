use tracing::debug;

use crate::{
    error::GeometryError,
    geom,
    layer::{Tract, TractId, ZoneId, ZoneLayer},
};

/// One disjoint piece of a zone ∩ tract intersection.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapFragment {
    pub zone_id: ZoneId,
    pub tract_id: TractId,
    /// Area of this piece alone, in squared units of the projected reference.
    pub area: f64,
}

/// Fragments produced by intersecting the tract layer with the zone layer.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    pub fragments: Vec<OverlapFragment>,
    /// Tracts that could not be intersected.
    pub skipped: Vec<GeometryError>,
}

/// Intersect every tract with the zones it overlaps.
///
/// Only pieces with positive area are emitted; a tract that meets a zone in several
/// disjoint places yields one fragment per place. Fragments are ordered by tract, then
/// zone.
pub fn overlay(zones: &ZoneLayer, tracts: &[Tract]) -> Overlay {
    let mut result = Overlay::default();
    if zones.is_empty() { return result }

    for tract in tracts {
        if let Err(issue) = geom::polygonal_area(&tract.geometry) {
            result.skipped.push(GeometryError::tract(None, tract.id.as_str(), issue));
            continue;
        }

        let pieces = zones.geoms().overlap_pieces(&tract.geometry);
        debug!("[overlay] tract {} -> {} pieces", tract.id, pieces.len());
        result.fragments.extend(pieces.into_iter().map(|(idx, area)| OverlapFragment {
            zone_id: zones.ids()[idx],
            tract_id: tract.id.clone(),
            area,
        }));
    }

    result
}
