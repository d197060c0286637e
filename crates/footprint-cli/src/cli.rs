use clap::{Args, Parser, Subcommand};
use footprint_core::config::{parse_feature_limit, parse_opacity};
use std::path::PathBuf;

/// Footprint - Building footprint explorer
#[derive(Parser, Debug)]
#[command(name = "footprint")]
#[command(about = "Explore building footprints inside areas of interest", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Base URL of the building service
    #[arg(long, global = true)]
    pub service_url: Option<String>,

    /// Serve buildings from a local GeoJSON file instead of the service
    #[arg(long, global = true, value_name = "BUILDINGS_GEOJSON")]
    pub fixture: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long = "config", id = "config_file", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum number of buildings returned per request
    #[arg(long, global = true, value_parser = limit_arg)]
    pub limit: Option<usize>,

    /// Building overlay opacity between 0 and 1
    #[arg(long, global = true, value_parser = opacity_arg)]
    pub opacity: Option<f64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether the building service has data loaded
    Health(HealthArgs),

    /// List the areas of a GeoJSON file
    Areas(AreasArgs),

    /// Fetch buildings inside an area and summarize them
    Fetch(FetchArgs),

    /// Export buildings inside an area as GeoJSON
    Export(ExportArgs),

    /// Compute building statistics for an area without fetching geometry
    Stats(StatsArgs),

    /// Show the effective configuration and where each value comes from
    Config,
}

#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Keep polling until the data is ready
    #[arg(long)]
    pub wait: bool,

    /// Give up waiting after this many seconds
    #[arg(long, requires = "wait")]
    pub timeout: Option<u64>,
}

#[derive(Args, Debug)]
pub struct AreasArgs {
    /// GeoJSON FeatureCollection of areas
    pub file: PathBuf,
}

/// Area of interest, either uploaded or drawn
#[derive(Args, Debug, Default)]
pub struct AreaArgs {
    /// GeoJSON FeatureCollection of areas; all are selected initially
    #[arg(long, conflicts_with_all = ["bbox", "polygon"])]
    pub area: Option<PathBuf>,

    /// Deselect an uploaded area by name (repeatable)
    #[arg(long, requires = "area")]
    pub exclude: Vec<String>,

    /// Choose the uploaded areas interactively
    #[arg(long, requires = "area")]
    pub interactive: bool,

    /// Draw a rectangle: minx,miny,maxx,maxy
    #[arg(long, conflicts_with = "polygon", allow_hyphen_values = true)]
    pub bbox: Option<String>,

    /// Draw a polygon: "x y;x y;x y[;...]"
    #[arg(long, allow_hyphen_values = true)]
    pub polygon: Option<String>,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    #[command(flatten)]
    pub area: AreaArgs,

    /// Show the tooltip of the building at lon,lat
    #[arg(long, allow_hyphen_values = true)]
    pub pick: Option<String>,

    /// List the fetched buildings
    #[arg(long)]
    pub features: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub area: AreaArgs,

    /// Output file (defaults to the name suggested by the service)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub area: AreaArgs,
}

fn limit_arg(s: &str) -> Result<usize, String> {
    parse_feature_limit(s).map_err(|e| e.to_string())
}

fn opacity_arg(s: &str) -> Result<f64, String> {
    parse_opacity(s).map_err(|e| e.to_string())
}
