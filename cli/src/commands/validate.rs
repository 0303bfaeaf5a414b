use std::collections::BTreeSet;

use anyhow::{bail, Context, Result};
use tractwalk::{read_crosswalk, read_zone_attributes, WEIGHT_SUM_TOLERANCE};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::ValidateArgs) -> Result<()> {
    let rows = read_crosswalk(&args.crosswalk)
        .with_context(|| format!("[validate] failed to read {}", args.crosswalk.display()))?;
    let zone_ids = read_zone_attributes(&args.zones, &args.zone_id_field, None)
        .with_context(|| format!("[validate] failed to read zone ids from {}", args.zones.display()))?
        .into_keys()
        .collect::<BTreeSet<_>>();

    let report = tractwalk::validate(&rows, &zone_ids);

    println!("[validate] {} rows covering {} zones", rows.len(), report.zone_sums.len());
    if report.sums_ok() {
        println!("[validate] all zone weights sum to 1 (tolerance {WEIGHT_SUM_TOLERANCE:e})");
    } else {
        println!("[validate] {} zones do not sum to 1:", report.unbalanced.len());
        for (zone_id, sum) in &report.unbalanced {
            println!("[validate]   zone {zone_id}: {sum:.8}");
        }
    }

    if report.is_complete() {
        println!("[validate] all {} input zones are present", zone_ids.len());
    } else {
        let missing = report.missing.iter().map(|id| id.to_string()).collect::<Vec<_>>();
        println!("[validate] {} input zones missing from the table: {}", missing.len(), missing.join(", "));
    }

    if !report.sums_ok() {
        bail!("[validate] {} zones have weight sums outside 1 ± {WEIGHT_SUM_TOLERANCE:e}", report.unbalanced.len());
    }
    Ok(())
}
