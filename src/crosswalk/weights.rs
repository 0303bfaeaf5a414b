use std::collections::BTreeMap;

use tracing::warn;

use crate::{
    crosswalk::{Crosswalk, OverlapFragment, WeightedLink},
    error::ZoneDroppedWarning,
    layer::{TractId, ZoneId},
};

type PairKey = (ZoneId, TractId);

/// Result of turning overlap fragments into a crosswalk.
#[derive(Debug, Clone)]
pub struct Apportionment {
    pub crosswalk: Crosswalk,
    /// Zones left with no link after filtering, in zone order.
    pub dropped: Vec<ZoneDroppedWarning>,
    /// Number of (zone, tract) pairs removed by the significance filter.
    pub filtered_out: usize,
}

/// Aggregates fragments into per-zone tract weights.
///
/// The steps run in a fixed order: sum fragment areas per (zone, tract), divide by the
/// zone's total area, drop pairs below the threshold, and only then rescale each zone's
/// survivors to sum to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightAggregator {
    threshold: f64,
}

impl Default for WeightAggregator {
    fn default() -> Self { Self::new(crate::config::DEFAULT_THRESHOLD) }
}

impl WeightAggregator {
    /// Pairs with raw weight `>= threshold` are kept.
    pub fn new(threshold: f64) -> Self { Self { threshold } }

    #[inline] pub fn threshold(&self) -> f64 { self.threshold }

    /// Build the crosswalk from `fragments`, using `total_areas` (every zone of the layer,
    /// keyed by id) as the denominators.
    pub fn apportion(&self, fragments: &[OverlapFragment], total_areas: &BTreeMap<ZoneId, f64>) -> Apportionment {
        let raw = raw_weights(aggregate(fragments), total_areas);
        let candidates = raw.len();

        let kept = raw.iter()
            .filter(|&(_, &weight)| weight >= self.threshold)
            .map(|(key, &weight)| (key.clone(), weight))
            .collect::<BTreeMap<_, _>>();
        let filtered_out = candidates - kept.len();

        let links = renormalize(kept);
        let crosswalk = Crosswalk::new(links, self.threshold);
        let dropped = dropped_zones(&crosswalk, &raw, total_areas);

        Apportionment { crosswalk, dropped, filtered_out }
    }
}

/// Sum fragment areas per (zone, tract), collapsing disjoint pieces of one overlap.
fn aggregate(fragments: &[OverlapFragment]) -> BTreeMap<PairKey, f64> {
    let mut areas: BTreeMap<PairKey, f64> = BTreeMap::new();
    for fragment in fragments {
        *areas.entry((fragment.zone_id, fragment.tract_id.clone())).or_default() += fragment.area;
    }
    areas
}

/// Divide each pair's area by its zone's total area.
fn raw_weights(areas: BTreeMap<PairKey, f64>, total_areas: &BTreeMap<ZoneId, f64>) -> BTreeMap<PairKey, f64> {
    areas.into_iter()
        .filter_map(|(key, area)| match total_areas.get(&key.0) {
            Some(&total) if total > 0.0 => Some((key, area / total)),
            _ => {
                warn!("[weights] fragment for zone {} without a usable total area ignored", key.0);
                None
            }
        })
        .collect()
}

/// Rescale surviving raw weights so each zone's weights sum to one.
fn renormalize(kept: BTreeMap<PairKey, f64>) -> Vec<WeightedLink> {
    let mut sums: BTreeMap<ZoneId, f64> = BTreeMap::new();
    for ((zone_id, _), weight) in &kept {
        *sums.entry(*zone_id).or_default() += weight;
    }

    kept.into_iter()
        .map(|((zone_id, tract_id), raw_weight)| WeightedLink {
            zone_id,
            tract_id,
            raw_weight,
            normalized_weight: raw_weight / sums[&zone_id],
        })
        .collect()
}

/// Zones of the layer with no surviving link.
fn dropped_zones(crosswalk: &Crosswalk, raw: &BTreeMap<PairKey, f64>, total_areas: &BTreeMap<ZoneId, f64>) -> Vec<ZoneDroppedWarning> {
    let linked = crosswalk.zone_ids();
    total_areas.keys()
        .filter(|zone_id| !linked.contains(zone_id))
        .map(|&zone_id| {
            let weights = raw.range((zone_id, TractId::new(""))..)
                .take_while(|((z, _), _)| *z == zone_id)
                .map(|(_, &weight)| weight)
                .collect::<Vec<_>>();
            ZoneDroppedWarning {
                zone_id,
                candidates: weights.len(),
                max_raw_weight: weights.into_iter().fold(0.0, f64::max),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crosswalk::WEIGHT_SUM_TOLERANCE;

    fn fragment(zone: i64, tract: &str, area: f64) -> OverlapFragment {
        OverlapFragment { zone_id: ZoneId(zone), tract_id: tract.into(), area }
    }

    fn areas(entries: &[(i64, f64)]) -> BTreeMap<ZoneId, f64> {
        entries.iter().map(|&(id, area)| (ZoneId(id), area)).collect()
    }

    fn assert_sums_to_one(crosswalk: &Crosswalk) {
        for zone_id in crosswalk.zone_ids() {
            let sum = crosswalk.zone_weight_sum(zone_id);
            assert!((sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE, "zone {zone_id} sums to {sum}");
        }
    }

    #[test]
    fn boundary_weight_is_kept_at_default_threshold() {
        let fragments = vec![fragment(1, "T1", 600.0), fragment(1, "T2", 390.0), fragment(1, "T3", 10.0)];
        let result = WeightAggregator::default().apportion(&fragments, &areas(&[(1, 1000.0)]));

        assert_eq!(result.crosswalk.len(), 3);
        assert_eq!(result.filtered_out, 0);
        let weights = result.crosswalk.links().iter().map(|l| l.normalized_weight).collect::<Vec<_>>();
        assert!((weights[0] - 0.6).abs() < 1e-12);
        assert!((weights[1] - 0.39).abs() < 1e-12);
        assert!((weights[2] - 0.01).abs() < 1e-12);
        assert_sums_to_one(&result.crosswalk);
    }

    #[test]
    fn filtered_zone_is_renormalized_after_filtering() {
        let fragments = vec![fragment(1, "T1", 600.0), fragment(1, "T2", 390.0), fragment(1, "T3", 10.0)];
        let result = WeightAggregator::new(0.011).apportion(&fragments, &areas(&[(1, 1000.0)]));

        let links = result.crosswalk.links();
        assert_eq!(links.len(), 2);
        assert_eq!(result.filtered_out, 1);
        assert_eq!(links[0].tract_id.as_str(), "T1");
        assert!((links[0].raw_weight - 0.6).abs() < 1e-12);
        assert!((links[0].normalized_weight - 0.6 / 0.99).abs() < 1e-12);
        assert!((links[0].normalized_weight - 0.6061).abs() < 1e-4);
        assert!((links[1].normalized_weight - 0.3939).abs() < 1e-4);
        assert_sums_to_one(&result.crosswalk);
    }

    #[test]
    fn disjoint_fragments_are_summed_before_weighting() {
        let fragments = vec![fragment(1, "T1", 100.0), fragment(1, "T1", 150.0), fragment(1, "T2", 750.0)];
        let result = WeightAggregator::default().apportion(&fragments, &areas(&[(1, 1000.0)]));

        let links = result.crosswalk.links();
        assert_eq!(links.len(), 2);
        assert!((links[0].raw_weight - 0.25).abs() < 1e-12);
    }

    #[test]
    fn split_pieces_count_together_against_the_threshold() {
        // Each piece alone is under 1%, together they are not.
        let fragments = vec![fragment(1, "T1", 6.0), fragment(1, "T1", 6.0), fragment(1, "T2", 988.0)];
        let result = WeightAggregator::default().apportion(&fragments, &areas(&[(1, 1000.0)]));
        assert_eq!(result.crosswalk.len(), 2);
    }

    #[test]
    fn raw_weight_uses_zone_total_not_fragment_sum() {
        // Fragments cover only 90% of the zone; the survivors still get rescaled to one.
        let fragments = vec![fragment(1, "T1", 450.0), fragment(1, "T2", 450.0)];
        let result = WeightAggregator::default().apportion(&fragments, &areas(&[(1, 1000.0)]));

        for link in result.crosswalk.links() {
            assert!((link.raw_weight - 0.45).abs() < 1e-12);
            assert!((link.normalized_weight - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn sliver_only_zone_is_dropped_with_warning() {
        let fragments = vec![
            fragment(1, "T1", 1000.0),
            fragment(2, "T1", 5.0),
            fragment(2, "T2", 3.0),
        ];
        let result = WeightAggregator::default().apportion(&fragments, &areas(&[(1, 1000.0), (2, 1000.0), (3, 50.0)]));

        assert_eq!(result.crosswalk.zone_ids().into_iter().collect::<Vec<_>>(), vec![ZoneId(1)]);
        assert_eq!(result.dropped.len(), 2);

        assert_eq!(result.dropped[0].zone_id, ZoneId(2));
        assert_eq!(result.dropped[0].candidates, 2);
        assert!((result.dropped[0].max_raw_weight - 0.005).abs() < 1e-12);

        // Zone 3 overlapped nothing at all.
        assert_eq!(result.dropped[1], ZoneDroppedWarning { zone_id: ZoneId(3), candidates: 0, max_raw_weight: 0.0 });
    }

    #[test]
    fn fragments_for_unknown_zones_are_ignored() {
        let fragments = vec![fragment(1, "T1", 10.0), fragment(9, "T1", 10.0)];
        let result = WeightAggregator::default().apportion(&fragments, &areas(&[(1, 10.0)]));
        assert_eq!(result.crosswalk.len(), 1);
        assert!(result.dropped.is_empty());
    }

    #[test]
    fn raising_threshold_never_adds_links() {
        let fragments = vec![
            fragment(1, "A", 500.0), fragment(1, "B", 300.0), fragment(1, "C", 150.0),
            fragment(1, "D", 40.0), fragment(1, "E", 9.0), fragment(1, "F", 1.0),
            fragment(2, "A", 20.0), fragment(2, "B", 20.0), fragment(2, "C", 5.0),
            fragment(2, "C", 4.0), fragment(2, "D", 1.0),
        ];
        let totals = areas(&[(1, 1000.0), (2, 50.0)]);

        let mut previous: Option<BTreeMap<ZoneId, usize>> = None;
        for threshold in [0.0, 0.001, 0.01, 0.05, 0.1, 0.2, 0.4, 0.6] {
            let result = WeightAggregator::new(threshold).apportion(&fragments, &totals);
            assert_sums_to_one(&result.crosswalk);

            let counts = totals.keys()
                .map(|&zone_id| (zone_id, result.crosswalk.links_for(zone_id).count()))
                .collect::<BTreeMap<_, _>>();
            if let Some(previous) = &previous {
                for (zone_id, count) in &counts {
                    assert!(count <= &previous[zone_id], "zone {zone_id} gained links at {threshold}");
                }
            }
            for link in result.crosswalk.links() {
                assert!(link.raw_weight >= threshold);
                assert!(link.normalized_weight > 0.0 && link.normalized_weight <= 1.0);
            }
            previous = Some(counts);
        }
    }
}
