use std::collections::{BTreeMap, BTreeSet};

use crate::{crosswalk::CrosswalkRow, layer::ZoneId};

/// Allowed distance of a zone's weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-5;

/// Outcome of checking a crosswalk table against the zone layer it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    /// Weight sum of every zone present in the table.
    pub zone_sums: BTreeMap<ZoneId, f64>,
    /// Zones whose sum is outside `1.0 ± WEIGHT_SUM_TOLERANCE`.
    pub unbalanced: Vec<(ZoneId, f64)>,
    /// Input zones with no row in the table.
    pub missing: BTreeSet<ZoneId>,
}

impl ValidationReport {
    /// Every zone in the table sums to one.
    pub fn sums_ok(&self) -> bool { self.unbalanced.is_empty() }

    /// Every input zone appears in the table.
    pub fn is_complete(&self) -> bool { self.missing.is_empty() }

    pub fn passed(&self) -> bool { self.sums_ok() && self.is_complete() }
}

/// Check per-zone weight sums and look for input zones absent from the table.
pub fn validate(rows: &[CrosswalkRow], input_zone_ids: &BTreeSet<ZoneId>) -> ValidationReport {
    let mut zone_sums: BTreeMap<ZoneId, f64> = BTreeMap::new();
    for row in rows {
        *zone_sums.entry(row.zone_id).or_default() += row.weight;
    }

    let unbalanced = zone_sums.iter()
        .filter(|&(_, &sum)| !((sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE))
        .map(|(&zone_id, &sum)| (zone_id, sum))
        .collect();

    let missing = input_zone_ids.iter()
        .copied()
        .filter(|zone_id| !zone_sums.contains_key(zone_id))
        .collect();

    ValidationReport { zone_sums, unbalanced, missing }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(zone: i64, tract: &str, weight: f64) -> CrosswalkRow {
        CrosswalkRow { zone_id: ZoneId(zone), tract_id: tract.into(), weight }
    }

    #[test]
    fn balanced_complete_table_passes() {
        let rows = vec![row(1, "a", 0.606061), row(1, "b", 0.393939), row(2, "a", 1.0)];
        let report = validate(&rows, &[ZoneId(1), ZoneId(2)].into());
        assert!(report.passed());
        assert_eq!(report.zone_sums.len(), 2);
    }

    #[test]
    fn sums_outside_tolerance_are_reported() {
        let rows = vec![row(1, "a", 0.6), row(1, "b", 0.39), row(2, "a", 1.000004)];
        let report = validate(&rows, &[ZoneId(1), ZoneId(2)].into());

        assert!(!report.sums_ok());
        assert_eq!(report.unbalanced.len(), 1);
        assert_eq!(report.unbalanced[0].0, ZoneId(1));
        assert!((report.unbalanced[0].1 - 0.99).abs() < 1e-12);
    }

    #[test]
    fn missing_zones_are_listed() {
        let rows = vec![row(1, "a", 1.0)];
        let report = validate(&rows, &[ZoneId(1), ZoneId(57), ZoneId(104)].into());

        assert!(report.sums_ok());
        assert!(!report.is_complete());
        assert_eq!(report.missing, BTreeSet::from([ZoneId(57), ZoneId(104)]));
    }

    #[test]
    fn nan_weight_fails_the_sum_check() {
        let report = validate(&[row(1, "a", f64::NAN)], &BTreeSet::new());
        assert!(!report.sums_ok());
    }
}
