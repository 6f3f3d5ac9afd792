#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI for exercising the street and intersection resolver.
//!
//! ```text
//! beavernet streets <query> [--limit 8]
//! beavernet analyze <address...>
//! beavernet intersections <street>
//! beavernet nearest <latitude> <longitude> [--max-distance 0.01]
//! beavernet stats
//! ```
//!
//! Datasets come from `--config <path>`, the `BEAVERNET_DATASETS`
//! environment variable, or the embedded defaults, in that order. Pass
//! `--json` for machine-readable output.
//!
//! The embedded defaults read `data/street_names.geojson` and
//! `data/road_intersections.geojson` relative to the working directory.
//! Load failures only log at `warn`, so queries from elsewhere quietly
//! return nothing; `beavernet stats` reports whether the datasets loaded.

mod output;

use std::path::PathBuf;

use beavernet_streets::{StreetStore, proximity, registry};
use clap::{Parser, Subcommand};

const DATASET_HELP: &str = "\
Without --config or BEAVERNET_DATASETS, datasets are read from
data/street_names.geojson and data/road_intersections.geojson relative to
the current directory. Load failures are logged at warn level (RUST_LOG=warn)
and queries then return no results; run `beavernet stats` to check that the
datasets loaded.";

#[derive(Parser)]
#[command(
    name = "beavernet",
    about = "Street suggestions, address analysis, and nearest-intersection lookup",
    after_help = DATASET_HELP
)]
struct Cli {
    /// Dataset config TOML (overrides `BEAVERNET_DATASETS`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest street names containing a partial query
    Streets {
        /// Partial street name (at least 2 characters)
        query: String,
        /// Maximum number of suggestions to show
        #[arg(long, default_value = "8")]
        limit: usize,
    },
    /// Detect streets, intersections, and the cross street in an address
    Analyze {
        /// Free-text address
        #[arg(required = true, num_args = 1..)]
        address: Vec<String>,
    },
    /// List intersections having a street as a member
    Intersections {
        /// Exact street name (case-insensitive)
        street: String,
    },
    /// Find the nearest intersection to a GPS coordinate
    #[command(allow_negative_numbers = true)]
    Nearest {
        /// Latitude in degrees
        latitude: f64,
        /// Longitude in degrees
        longitude: f64,
        /// Search tolerance in degrees
        #[arg(long, default_value_t = proximity::DEFAULT_MAX_DISTANCE)]
        max_distance: f64,
    },
    /// Load the datasets and print record counts, or report a load failure
    Stats,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = registry::resolve_config(cli.config.as_deref())?;
    log::debug!(
        "Using datasets {} and {}",
        config.streets.id,
        config.intersections.id
    );
    let store = StreetStore::from_config(config)?;

    match cli.command {
        Commands::Streets { query, limit } => {
            let mut streets = store.search_streets(&query).await;
            streets.truncate(limit);
            output::print_streets(&streets, cli.json)?;
        }
        Commands::Analyze { address } => {
            let address = address.join(" ");
            let analysis = store.analyze_address(&address).await;
            output::print_analysis(&analysis, cli.json)?;
        }
        Commands::Intersections { street } => {
            let intersections = store.find_intersections_for_street(&street).await;
            output::print_intersections(&intersections, cli.json)?;
        }
        Commands::Nearest {
            latitude,
            longitude,
            max_distance,
        } => {
            let closest = store
                .find_closest_intersection(latitude, longitude, max_distance)
                .await;
            output::print_closest(closest.as_ref(), cli.json)?;
        }
        Commands::Stats => {
            store.ensure_loaded().await;
            let stats = store.stats().await;
            output::print_stats(&stats, cli.json)?;
        }
    }

    Ok(())
}
