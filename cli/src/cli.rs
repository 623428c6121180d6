use std::path::PathBuf;

/// Slackline map engine CLI
#[derive(clap::Parser, Debug)]
#[command(name = "slackmap", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Map config (JSON), defaults to the built-in endpoints
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Print the source/layer plan for a legend selection as JSON
    Plan(PlanArgs),

    /// Parse or format the `map` URL parameter
    #[command(subcommand)]
    Viewport(ViewportCommand),

    /// Print the camera boxes for a feature of the point collection
    Bounds(BoundsArgs),

    /// Look up a community group
    Group(GroupArgs),
}

#[derive(clap::Args, Debug)]
pub struct PlanArgs {
    /// Show spots
    #[arg(long)]
    pub spots: bool,

    /// Show lines
    #[arg(long)]
    pub lines: bool,

    /// Show guides
    #[arg(long)]
    pub guides: bool,

    /// Show communities (replaces every slackline source)
    #[arg(long)]
    pub communities: bool,

    /// Disable point clustering
    #[arg(long)]
    pub no_cluster: bool,

    /// Feature hidden from the static sources
    #[arg(long)]
    pub exclude: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
pub enum ViewportCommand {
    /// Read a viewport from a query string, e.g. "?map=8.5,47.3,9"
    Parse {
        query: String,
    },
    /// Encode a viewport as the `map` parameter value
    Format {
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(default_value_t = 0.0)]
        zoom: f64,
    },
}

#[derive(clap::Args, Debug)]
pub struct BoundsArgs {
    /// Value of the `id` property of the feature
    pub id: String,

    /// Local GeoJSON FeatureCollection instead of the configured `clustersMain` endpoint
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Feature length in meters, sizes the buffer
    #[arg(short, long)]
    pub length: Option<f64>,

    /// Multiplier applied to the length
    #[arg(short, long)]
    pub padding: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct GroupArgs {
    pub id: String,
}
