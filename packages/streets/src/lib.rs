#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Street and intersection resolution for dispatch address entry.
//!
//! Loads the municipal street-name and road-intersection datasets once,
//! keeps them in memory, and answers the questions the smart address input
//! asks while a dispatcher types:
//!
//! - **Street suggestions** ([`matcher`]): which known street names contain
//!   the partial query.
//! - **Address analysis** ([`resolver`]): which known streets appear inside
//!   a free-text address, which intersections they form, and (when exactly
//!   one intersection contains every detected street) the cross street.
//! - **Nearest intersection** ([`proximity`]): the closest intersection to a
//!   GPS fix within a planar degree tolerance.
//!
//! Loading is best-effort. Fetch or parse failures are logged and the
//! [`StreetStore`] answers from empty data instead of returning errors.
//!
//! # Usage
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use beavernet_streets::{StreetStore, registry};
//!
//! let store = StreetStore::from_config(registry::default_config())?;
//! let analysis = store.analyze_address("123 Main St near Park Ave").await;
//! if let Some(cross) = analysis.cross_street {
//!     println!("Cross street: {cross}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod fetchers;
pub mod loader;
pub mod matcher;
pub mod parse;
pub mod proximity;
pub mod registry;
pub mod resolver;
pub mod store;

#[cfg(test)]
mod test_support;

use thiserror::Error;

pub use beavernet_streets_models::{
    AddressAnalysis, Coordinates, Intersection, ResolverConfig, StreetSegment,
};
pub use loader::{DatasetLoader, HttpDatasetLoader, StaticDatasetLoader};
pub use store::{StoreStats, StreetData, StreetStore};

/// Errors that can occur while fetching or configuring datasets.
#[derive(Debug, Error)]
pub enum StreetsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a local dataset or config file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be read or parsed.
    #[error("Config error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// The dataset document had an unexpected shape.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
