//! End-to-end crosswalk run: load, overlay, apportion, write.

use std::collections::{BTreeSet, HashMap};

use tracing::{info, warn};

use crate::{
    config::CrosswalkConfig,
    crosswalk::{overlay, Crosswalk, WeightAggregator},
    error::{CrosswalkError, GeometryError, ZoneDroppedWarning},
    io::csv::write_crosswalk,
    layer::{load_layers, LoadedLayers, ZoneId},
};

/// Everything a run produced besides the output file.
#[derive(Debug, Clone)]
pub struct CrosswalkReport {
    pub crosswalk: Crosswalk,
    /// Features skipped during loading or overlay.
    pub geometry_errors: Vec<GeometryError>,
    /// Input zones absent from the crosswalk, in zone order.
    pub dropped_zones: Vec<ZoneDroppedWarning>,
    /// Every zone id present in the zone input.
    pub input_zone_ids: BTreeSet<ZoneId>,
    /// Names of the dissolved zones that carry one.
    pub zone_names: HashMap<ZoneId, String>,
    /// (zone, tract) pairs removed by the significance filter.
    pub filtered_links: usize,
    /// Overlap pieces produced before aggregation.
    pub fragment_count: usize,
}

impl CrosswalkReport {
    /// Input zones that neither appear in the crosswalk nor carry a drop warning.
    /// Empty for every completed run.
    pub fn unaccounted_zones(&self) -> BTreeSet<ZoneId> {
        let linked = self.crosswalk.zone_ids();
        let dropped = self.dropped_zones.iter().map(|w| w.zone_id).collect::<BTreeSet<_>>();
        self.input_zone_ids.iter()
            .copied()
            .filter(|id| !linked.contains(id) && !dropped.contains(id))
            .collect()
    }
}

/// Overlay loaded layers and turn the fragments into a crosswalk.
///
/// Zones whose geometry was rejected at load time never reach the overlay; they are
/// reported alongside the zones the filter emptied.
pub fn build_crosswalk(layers: &LoadedLayers, threshold: f64) -> CrosswalkReport {
    let overlay = overlay(&layers.zones, &layers.tracts);
    let fragment_count = overlay.fragments.len();
    info!("[crosswalk] {} overlap fragments from {} tracts", fragment_count, layers.tracts.len());

    let apportionment = WeightAggregator::new(threshold).apportion(&overlay.fragments, &layers.zones.total_areas());

    let mut dropped_zones = apportionment.dropped;
    dropped_zones.extend(layers.rejected_zone_ids().into_iter().map(|zone_id| ZoneDroppedWarning {
        zone_id,
        candidates: 0,
        max_raw_weight: 0.0,
    }));
    dropped_zones.sort_by_key(|w| w.zone_id);

    let mut geometry_errors = layers.skipped.clone();
    geometry_errors.extend(overlay.skipped);

    CrosswalkReport {
        crosswalk: apportionment.crosswalk,
        geometry_errors,
        dropped_zones,
        input_zone_ids: layers.input_zone_ids.clone(),
        zone_names: layers.zones.names(),
        filtered_links: apportionment.filtered_out,
        fragment_count,
    }
}

/// Run the whole pipeline described by `config` and write the crosswalk CSV.
pub fn run_pipeline(config: &CrosswalkConfig) -> Result<CrosswalkReport, CrosswalkError> {
    let layers = load_layers(config)?;
    let report = build_crosswalk(&layers, config.threshold);

    write_crosswalk(&report.crosswalk, &config.output)?;
    info!(
        "[crosswalk] wrote {} links for {} zones to {}",
        report.crosswalk.len(),
        report.crosswalk.zone_ids().len(),
        config.output.display(),
    );

    log_issues(&report);
    Ok(report)
}

fn log_issues(report: &CrosswalkReport) {
    info!("[crosswalk] {} sub-threshold links removed (threshold {})", report.filtered_links, report.crosswalk.threshold());

    if !report.geometry_errors.is_empty() {
        warn!("[crosswalk] {} features skipped for unusable geometry", report.geometry_errors.len());
        for error in &report.geometry_errors {
            warn!("[crosswalk]   {error}");
        }
    }
    if !report.dropped_zones.is_empty() {
        warn!("[crosswalk] {} zones have no link in the output", report.dropped_zones.len());
        for dropped in &report.dropped_zones {
            warn!("[crosswalk]   {dropped}");
        }
    }
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};

    use super::*;
    use crate::layer::{Tract, ZoneFeature};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1), (x: x0, y: y0),
        ]])
    }

    fn zone(id: i64, geometry: MultiPolygon<f64>) -> ZoneFeature {
        ZoneFeature { id: ZoneId(id), name: None, geometry }
    }

    #[test]
    fn every_input_zone_is_linked_or_reported() {
        let layers = LoadedLayers::from_features(
            vec![
                ZoneFeature { id: ZoneId(1), name: Some("Alpha".into()), geometry: rect(0.0, 0.0, 10.0, 10.0) },
                zone(1, rect(10.0, 0.0, 20.0, 10.0)),
                // Overlaps tract "b" by 0.5%.
                zone(2, rect(20.0, 0.0, 30.0, 10.0)),
                zone(3, MultiPolygon(vec![])),
            ],
            vec![
                Tract::new("a", rect(0.0, 0.0, 20.0, 10.0)),
                Tract::new("b", rect(29.95, 0.0, 40.0, 10.0)),
            ],
        );

        let report = build_crosswalk(&layers, 0.01);

        assert_eq!(report.crosswalk.zone_ids(), BTreeSet::from([ZoneId(1)]));
        assert_eq!(report.dropped_zones.iter().map(|w| w.zone_id).collect::<Vec<_>>(), vec![ZoneId(2), ZoneId(3)]);
        assert!(report.unaccounted_zones().is_empty());
        assert_eq!(report.zone_names, HashMap::from([(ZoneId(1), "Alpha".to_string())]));
        assert_eq!(report.geometry_errors.len(), 1);
        assert_eq!(report.filtered_links, 1);
        assert!((report.crosswalk.zone_weight_sum(ZoneId(1)) - 1.0).abs() <= 1e-5);
    }
}
