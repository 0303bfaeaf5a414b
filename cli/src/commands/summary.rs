use std::collections::HashMap;

use anyhow::{Context, Result};
use tractwalk::{read_crosswalk, read_zone_attributes, CrosswalkSummary, ZoneId};

/// Width of the histogram bars, in characters, for the fullest bin.
const BAR_WIDTH: usize = 40;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::SummaryArgs) -> Result<()> {
    let rows = read_crosswalk(&args.crosswalk)
        .with_context(|| format!("[summary] failed to read {}", args.crosswalk.display()))?;

    let names: HashMap<ZoneId, String> = match &args.zones {
        Some(path) => read_zone_attributes(path, &args.zone_id_field, Some(args.zone_name_field.as_str()))
            .with_context(|| format!("[summary] failed to read zone names from {}", path.display()))?
            .into_iter()
            .filter_map(|(id, name)| Some((id, name?)))
            .collect(),
        None => HashMap::new(),
    };

    let summary = CrosswalkSummary::new(&rows);
    println!("[summary] {} rows, {} zones", rows.len(), summary.tracts_per_zone().len());

    println!("[summary] tracts per zone:");
    for (tracts, zones) in summary.tract_count_distribution() {
        println!("[summary]   {tracts:>3} tracts: {zones} zones");
    }

    println!("[summary] top {} zones by tract count:", args.top);
    for zone in summary.most_complex_zones(args.top, &names) {
        println!("[summary]   {:>3}  {}", zone.tract_count, zone.label);
    }

    let histogram = summary.weight_histogram(args.bins);
    let fullest = histogram.iter().map(|bin| bin.count).max().unwrap_or(0).max(1);
    println!("[summary] weight distribution:");
    for bin in &histogram {
        let bar = "#".repeat(bin.count * BAR_WIDTH / fullest);
        println!("[summary]   {:.3}-{:.3} {:>6} {bar}", bin.lower, bin.upper, bin.count);
    }

    if let Some(zone) = args.zone {
        match summary.zone_weight_sum(ZoneId(zone)) {
            Some(sum) => println!("[summary] zone {zone} weights sum to {sum:.6}"),
            None => println!("[summary] zone {zone} has no rows"),
        }
    }

    Ok(())
}
