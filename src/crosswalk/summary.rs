use std::collections::{BTreeMap, HashMap};

use crate::{crosswalk::CrosswalkRow, layer::ZoneId};

/// A zone ranked by how many tracts it spreads over.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneComplexity {
    pub zone_id: ZoneId,
    /// `name (id)` when the zone name is known, else `ID: id`.
    pub label: String,
    pub tract_count: usize,
}

/// One bucket of the weight histogram, covering `[lower, upper)` (the last bucket includes 1.0).
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Descriptive statistics over a crosswalk table.
#[derive(Debug, Clone)]
pub struct CrosswalkSummary<'a> {
    rows: &'a [CrosswalkRow],
    tracts_per_zone: BTreeMap<ZoneId, usize>,
}

impl<'a> CrosswalkSummary<'a> {
    pub fn new(rows: &'a [CrosswalkRow]) -> Self {
        let mut tracts_per_zone: BTreeMap<ZoneId, usize> = BTreeMap::new();
        for row in rows {
            *tracts_per_zone.entry(row.zone_id).or_default() += 1;
        }
        Self { rows, tracts_per_zone }
    }

    /// Number of tracts linked to each zone.
    #[inline] pub fn tracts_per_zone(&self) -> &BTreeMap<ZoneId, usize> { &self.tracts_per_zone }

    /// How many zones link to exactly `n` tracts, for every `n` that occurs.
    pub fn tract_count_distribution(&self) -> BTreeMap<usize, usize> {
        let mut distribution: BTreeMap<usize, usize> = BTreeMap::new();
        for &count in self.tracts_per_zone.values() {
            *distribution.entry(count).or_default() += 1;
        }
        distribution
    }

    /// The `n` zones linked to the most tracts, ties broken by ascending zone id.
    pub fn most_complex_zones(&self, n: usize, names: &HashMap<ZoneId, String>) -> Vec<ZoneComplexity> {
        let mut ranked = self.tracts_per_zone.iter()
            .map(|(&zone_id, &tract_count)| (zone_id, tract_count))
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        ranked.into_iter()
            .take(n)
            .map(|(zone_id, tract_count)| ZoneComplexity {
                zone_id,
                label: match names.get(&zone_id) {
                    Some(name) => format!("{name} ({zone_id})"),
                    None => format!("ID: {zone_id}"),
                },
                tract_count,
            })
            .collect()
    }

    /// Histogram of weights over `[0, 1]` with `bins` equal-width buckets.
    pub fn weight_histogram(&self, bins: usize) -> Vec<HistogramBin> {
        if bins == 0 { return Vec::new() }

        let width = 1.0 / bins as f64;
        let mut counts = vec![0usize; bins];
        for row in self.rows {
            if !(0.0..=1.0).contains(&row.weight) { continue }
            let idx = ((row.weight / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        counts.into_iter().enumerate()
            .map(|(i, count)| HistogramBin {
                lower: i as f64 * width,
                upper: if i + 1 == bins { 1.0 } else { (i + 1) as f64 * width },
                count,
            })
            .collect()
    }

    /// Weight sum of a single zone, or `None` if it has no rows.
    pub fn zone_weight_sum(&self, zone_id: ZoneId) -> Option<f64> {
        self.tracts_per_zone.contains_key(&zone_id).then(|| {
            self.rows.iter()
                .filter(|row| row.zone_id == zone_id)
                .map(|row| row.weight)
                .sum()
        })
    }
}
