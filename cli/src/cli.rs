use std::path::PathBuf;

/// Taxi zone to census tract crosswalk CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "tractwalk", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Build the crosswalk table from the zone and tract layers
    Build(BuildArgs),

    /// Check per-zone weight sums and zone coverage of a crosswalk table
    Validate(ValidateArgs),

    /// Print descriptive statistics of a crosswalk table
    Summary(SummaryArgs),
}

#[derive(clap::Args, Debug)]
pub struct BuildArgs {
    /// JSON run configuration; flags below override its fields
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Zone layer shapefile, defaults to "taxi_zones/taxi_zones.shp"
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub zones: Option<PathBuf>,

    /// Tract layer shapefile, defaults to "nyc_tracts/nyct2020.shp"
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub tracts: Option<PathBuf>,

    /// Output CSV, defaults to "nyc_zone_tract_crosswalk_FINAL.csv"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Minimum raw weight a (zone, tract) pair needs to be kept, defaults to 0.01
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Projected reference used for areas, e.g. EPSG:2263
    #[arg(long)]
    pub target_crs: Option<String>,

    /// Zone identifier field, defaults to "LocationID"
    #[arg(long)]
    pub zone_id_field: Option<String>,

    /// Tract identifier field, defaults to "BoroCT2020"
    #[arg(long)]
    pub tract_id_field: Option<String>,

    /// Reference of the zone layer when its .prj is missing or unrecognized
    #[arg(long)]
    pub zone_crs: Option<String>,

    /// Reference of the tract layer when its .prj is missing or unrecognized
    #[arg(long)]
    pub tract_crs: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Crosswalk CSV to check
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub crosswalk: PathBuf,

    /// Zone layer shapefile listing the expected zone ids
    #[arg(long, value_hint = clap::ValueHint::FilePath, default_value = "taxi_zones/taxi_zones.shp")]
    pub zones: PathBuf,

    /// Zone identifier field
    #[arg(long, default_value = "LocationID")]
    pub zone_id_field: String,
}

#[derive(clap::Args, Debug)]
pub struct SummaryArgs {
    /// Crosswalk CSV to describe
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub crosswalk: PathBuf,

    /// Zone layer shapefile, used only for zone names
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub zones: Option<PathBuf>,

    /// Zone identifier field
    #[arg(long, default_value = "LocationID")]
    pub zone_id_field: String,

    /// Zone name field
    #[arg(long, default_value = "zone")]
    pub zone_name_field: String,

    /// Number of most complex zones to list
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// Number of weight histogram bins
    #[arg(long, default_value_t = 30)]
    pub bins: usize,

    /// Print the weight sum of a single zone
    #[arg(long)]
    pub zone: Option<i64>,
}
