use std::collections::BTreeSet;

use crate::layer::{TractId, ZoneId};

/// An aggregated (zone, tract) pair that survived the significance filter.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedLink {
    pub zone_id: ZoneId,
    pub tract_id: TractId,
    /// Share of the zone's total area covered by the tract.
    pub raw_weight: f64,
    /// Raw weight rescaled so the zone's surviving links sum to one.
    pub normalized_weight: f64,
}

/// One row of the published table: `LocationID, census_tract_id, apportion_weight`.
#[derive(Debug, Clone, PartialEq)]
pub struct CrosswalkRow {
    pub zone_id: ZoneId,
    pub tract_id: TractId,
    pub weight: f64,
}

/// Final zone → tract weight table, sorted by zone id then tract id.
#[derive(Debug, Clone, PartialEq)]
pub struct Crosswalk {
    links: Vec<WeightedLink>,
    threshold: f64,
}

impl Crosswalk {
    pub(crate) fn new(mut links: Vec<WeightedLink>, threshold: f64) -> Self {
        links.sort_by(|a, b| (a.zone_id, &a.tract_id).cmp(&(b.zone_id, &b.tract_id)));
        Self { links, threshold }
    }

    #[inline] pub fn links(&self) -> &[WeightedLink] { &self.links }

    #[inline] pub fn len(&self) -> usize { self.links.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.links.is_empty() }

    /// Threshold the links were filtered with.
    #[inline] pub fn threshold(&self) -> f64 { self.threshold }

    /// Zones with at least one link.
    pub fn zone_ids(&self) -> BTreeSet<ZoneId> {
        self.links.iter().map(|link| link.zone_id).collect()
    }

    /// Links of one zone, in tract order.
    pub fn links_for(&self, zone_id: ZoneId) -> impl Iterator<Item = &WeightedLink> + '_ {
        let start = self.links.partition_point(|link| link.zone_id < zone_id);
        self.links[start..].iter().take_while(move |link| link.zone_id == zone_id)
    }

    /// Sum of normalized weights for one zone (0.0 if the zone has no links).
    pub fn zone_weight_sum(&self, zone_id: ZoneId) -> f64 {
        self.links_for(zone_id).map(|link| link.normalized_weight).sum()
    }

    /// The published (zone, tract, normalized weight) rows.
    pub fn rows(&self) -> Vec<CrosswalkRow> {
        self.links.iter()
            .map(|link| CrosswalkRow {
                zone_id: link.zone_id,
                tract_id: link.tract_id.clone(),
                weight: link.normalized_weight,
            })
            .collect()
    }
}
