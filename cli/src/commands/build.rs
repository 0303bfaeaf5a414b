use anyhow::{Context, Result};
use tractwalk::{CrosswalkConfig, CrosswalkSummary};

/// Zones listed after a build, most tracts first.
const TOP_ZONES: usize = 5;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::BuildArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => CrosswalkConfig::from_json_file(path)?,
        None => CrosswalkConfig::default(),
    };

    if let Some(zones) = &args.zones { config.zones.path = zones.clone() }
    if let Some(tracts) = &args.tracts { config.tracts.path = tracts.clone() }
    if let Some(output) = &args.output { config.output = output.clone() }
    if let Some(threshold) = args.threshold { config.threshold = threshold }
    if let Some(target_crs) = &args.target_crs { config.target_crs = target_crs.clone() }
    if let Some(field) = &args.zone_id_field { config.zones.id_field = field.clone() }
    if let Some(field) = &args.tract_id_field { config.tracts.id_field = field.clone() }
    if let Some(crs) = &args.zone_crs { config.zones.crs = Some(crs.clone()) }
    if let Some(crs) = &args.tract_crs { config.tracts.crs = Some(crs.clone()) }

    let report = tractwalk::run_pipeline(&config)
        .with_context(|| format!("[build] failed to build crosswalk into {}", config.output.display()))?;

    println!(
        "[build] {} links, {} zones linked, {} zones dropped, {} features skipped -> {}",
        report.crosswalk.len(),
        report.crosswalk.zone_ids().len(),
        report.dropped_zones.len(),
        report.geometry_errors.len(),
        config.output.display(),
    );

    let rows = report.crosswalk.rows();
    for zone in CrosswalkSummary::new(&rows).most_complex_zones(TOP_ZONES, &report.zone_names) {
        println!("[build]   {:>3} tracts  {}", zone.tract_count, zone.label);
    }

    Ok(())
}
