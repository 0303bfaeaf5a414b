use std::collections::{BTreeMap, HashMap};

use geo::MultiPolygon;

use crate::{
    error::{GeometryError, GeometryIssue},
    geom::{self, Geometries},
    layer::ZoneId,
};

/// One input zone polygon before dissolving. Several may share an id.
#[derive(Debug, Clone)]
pub struct ZoneFeature {
    pub id: ZoneId,
    pub name: Option<String>,
    pub geometry: MultiPolygon<f64>,
}

/// Read-only view of one dissolved zone.
#[derive(Debug, Clone, Copy)]
pub struct Zone<'a> {
    pub id: ZoneId,
    pub name: Option<&'a str>,
    pub geometry: &'a MultiPolygon<f64>,
    pub total_area: f64,
}

/// The dissolved zone layer: exactly one geometry per zone id, with its area fixed at
/// construction time.
#[derive(Debug, Clone)]
pub struct ZoneLayer {
    ids: Vec<ZoneId>,
    names: Vec<Option<String>>,
    total_areas: Vec<f64>,
    index: HashMap<ZoneId, usize>,
    geoms: Geometries,
}

impl ZoneLayer {
    /// Dissolve features by id into one (possibly multi-part) geometry per zone.
    ///
    /// The first non-empty name seen for an id is kept. Parts with non-finite coordinates
    /// never reach the union. Zones whose merged geometry has no usable area are left out
    /// and reported.
    pub fn dissolve(features: Vec<ZoneFeature>) -> (Self, Vec<GeometryError>) {
        let mut skipped = Vec::new();
        let mut names: BTreeMap<ZoneId, Option<String>> = BTreeMap::new();
        let parts = features.into_iter()
            .filter_map(|feature| {
                if let Err(GeometryIssue::NonFinite) = geom::polygonal_area(&feature.geometry) {
                    skipped.push(GeometryError::zone(None, feature.id, GeometryIssue::NonFinite));
                    return None;
                }
                let name = names.entry(feature.id).or_default();
                if name.is_none() { *name = feature.name; }
                Some((feature.id, feature.geometry))
            })
            .collect::<Vec<_>>();

        let mut ids = Vec::new();
        let mut shapes = Vec::new();
        let mut total_areas = Vec::new();
        for (id, shape) in geom::dissolve(parts) {
            match geom::polygonal_area(&shape) {
                Ok(area) => {
                    ids.push(id);
                    shapes.push(shape);
                    total_areas.push(area);
                }
                Err(issue) => skipped.push(GeometryError::zone(None, id, issue)),
            }
        }

        let names = ids.iter()
            .map(|id| names.remove(id).flatten())
            .collect();
        let index = ids.iter().enumerate()
            .map(|(i, &id)| (id, i))
            .collect();

        (Self { ids, names, total_areas, index, geoms: Geometries::new(shapes) }, skipped)
    }

    #[inline] pub fn len(&self) -> usize { self.ids.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    /// Zone ids in ascending order.
    #[inline] pub fn ids(&self) -> &[ZoneId] { &self.ids }

    /// Get a zone by id.
    pub fn get(&self, id: ZoneId) -> Option<Zone<'_>> {
        self.index.get(&id).map(|&i| self.zone(i))
    }

    /// Iterate zones in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = Zone<'_>> + '_ {
        (0..self.len()).map(|i| self.zone(i))
    }

    /// Total area of every zone, keyed by id.
    pub fn total_areas(&self) -> BTreeMap<ZoneId, f64> {
        self.ids.iter().copied().zip(self.total_areas.iter().copied()).collect()
    }

    /// Zone names keyed by id, for zones that have one.
    pub fn names(&self) -> HashMap<ZoneId, String> {
        self.ids.iter().zip(&self.names)
            .filter_map(|(&id, name)| name.clone().map(|name| (id, name)))
            .collect()
    }

    #[inline] pub(crate) fn geoms(&self) -> &Geometries { &self.geoms }

    fn zone(&self, i: usize) -> Zone<'_> {
        Zone {
            id: self.ids[i],
            name: self.names[i].as_deref(),
            geometry: self.geoms.shape(i),
            total_area: self.total_areas[i],
        }
    }
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    fn feature(id: i64, name: Option<&str>, x0: f64, y0: f64, x1: f64, y1: f64) -> ZoneFeature {
        ZoneFeature {
            id: ZoneId(id),
            name: name.map(str::to_string),
            geometry: MultiPolygon(vec![polygon![
                (x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1), (x: x0, y: y0),
            ]]),
        }
    }

    #[test]
    fn one_zone_per_id_with_dissolved_area() {
        let (layer, skipped) = ZoneLayer::dissolve(vec![
            feature(2, Some("Jamaica Bay"), 0.0, 0.0, 10.0, 10.0),
            feature(1, None, 20.0, 0.0, 30.0, 10.0),
            feature(2, None, 0.0, 0.0, 10.0, 10.0),
            feature(1, Some("Newark Airport"), 40.0, 0.0, 45.0, 10.0),
        ]);

        assert!(skipped.is_empty());
        assert_eq!(layer.ids(), &[ZoneId(1), ZoneId(2)]);

        let one = layer.get(ZoneId(1)).unwrap();
        assert!((one.total_area - 150.0).abs() < 1e-6);
        assert_eq!(one.name, Some("Newark Airport"));
        assert_eq!(one.geometry.0.len(), 2);

        let two = layer.get(ZoneId(2)).unwrap();
        assert!((two.total_area - 100.0).abs() < 1e-6);
        assert_eq!(layer.names().get(&ZoneId(2)).map(String::as_str), Some("Jamaica Bay"));
    }

    #[test]
    fn zero_area_zones_are_reported() {
        let (layer, skipped) = ZoneLayer::dissolve(vec![
            feature(1, None, 0.0, 0.0, 10.0, 10.0),
            feature(5, None, 0.0, 0.0, 10.0, 0.0),
        ]);
        assert_eq!(layer.len(), 1);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].id, "5");
        assert!(matches!(skipped[0].issue, GeometryIssue::Empty | GeometryIssue::ZeroArea));
    }

    #[test]
    fn redissolving_keeps_total_areas() {
        let (layer, _) = ZoneLayer::dissolve(vec![
            feature(1, None, 0.0, 0.0, 4.0, 4.0),
            feature(1, None, 2.0, 2.0, 6.0, 6.0),
            feature(3, None, 10.0, 0.0, 12.0, 1.0),
        ]);
        let again = layer.iter()
            .map(|zone| ZoneFeature { id: zone.id, name: None, geometry: zone.geometry.clone() })
            .collect();
        let (redissolved, _) = ZoneLayer::dissolve(again);

        for (id, area) in layer.total_areas() {
            assert!((area - redissolved.total_areas()[&id]).abs() < 1e-9);
        }
        assert_eq!(layer.ids(), redissolved.ids());
    }

    #[test]
    fn single_record_with_overlapping_parts_counts_overlap_once() {
        let mut zone = feature(4, None, 0.0, 0.0, 10.0, 10.0);
        zone.geometry.0.extend(feature(4, None, 5.0, 0.0, 15.0, 10.0).geometry);
        let (layer, skipped) = ZoneLayer::dissolve(vec![zone]);

        assert!(skipped.is_empty());
        assert!((layer.get(ZoneId(4)).unwrap().total_area - 150.0).abs() < 1e-6);
    }

    #[test]
    fn non_finite_parts_are_reported_before_the_union() {
        let mut broken = feature(6, None, 0.0, 0.0, 10.0, 10.0);
        broken.geometry.0[0].exterior_mut(|ring| ring.0[1].x = f64::NAN);
        let (layer, skipped) = ZoneLayer::dissolve(vec![broken, feature(7, None, 0.0, 0.0, 1.0, 1.0)]);

        assert_eq!(layer.ids(), &[ZoneId(7)]);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].issue, GeometryIssue::NonFinite);
    }
}
