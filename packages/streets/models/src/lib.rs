#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Street segment, intersection, and dataset source types.
//!
//! This crate contains only data types and the TOML schema for the street
//! and intersection datasets. It has no I/O and no heavyweight
//! dependencies, so UI-facing crates can share the result types without
//! pulling in the HTTP stack.

use serde::{Deserialize, Serialize};

/// Maximum number of member streets an intersection record carries
/// (`street1..street4`).
pub const MAX_INTERSECTION_MEMBERS: usize = 4;

/// One named street segment from the street-name index.
///
/// `street_behind` and `street_ahead` name the adjacent segments and act
/// as aliasing hints. `status` and `owner` are descriptive only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreetSegment {
    /// Source object identifier.
    pub object_id: Option<i64>,
    /// Primary street name.
    pub street: Option<String>,
    /// Street name of the segment behind this one.
    pub street_behind: Option<String>,
    /// Street name of the segment ahead of this one.
    pub street_ahead: Option<String>,
    /// Maintenance status.
    pub status: Option<String>,
    /// Owning jurisdiction.
    pub owner: Option<String>,
}

impl StreetSegment {
    /// Iterates the non-blank name fields in `street`, `street_behind`,
    /// `street_ahead` order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        [&self.street, &self.street_behind, &self.street_ahead]
            .into_iter()
            .filter_map(|name| non_blank(name.as_deref()))
    }
}

/// A `(longitude, latitude)` point in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
}

impl Coordinates {
    /// Returns `true` if both components are finite numbers.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }
}

/// A named junction of up to four streets at a fixed coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intersection {
    /// Source object identifier.
    pub object_id: Option<i64>,
    /// Human-readable label (e.g. "Main St & Park Ave").
    pub name: Option<String>,
    /// Present, non-blank member street names in `street1..street4` order.
    /// The main street is conventionally first.
    pub members: Vec<String>,
    /// Location of the intersection, if the feature had usable geometry.
    pub coordinates: Option<Coordinates>,
    /// Junction classification (descriptive only).
    pub junction_kind: Option<String>,
}

impl Intersection {
    /// Returns `true` if any member equals `lowercase_name` as a whole
    /// string, ignoring case and surrounding whitespace. The argument must
    /// already be trimmed and lowercase.
    #[must_use]
    pub fn has_member(&self, lowercase_name: &str) -> bool {
        self.members
            .iter()
            .any(|member| member.trim().to_lowercase() == lowercase_name)
    }
}

/// Result of analysing a free-text address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressAnalysis {
    /// Known street names found inside the address, deduplicated, in
    /// discovery order.
    pub detected_streets: Vec<String>,
    /// Candidate intersections (at most 10).
    pub suggested_intersections: Vec<Intersection>,
    /// Inferred cross street when exactly one intersection contains every
    /// detected street.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_street: Option<String>,
}

/// Returns the name unless it is missing or whitespace-only.
#[must_use]
pub fn non_blank(name: Option<&str>) -> Option<&str> {
    name.filter(|s| !s.trim().is_empty())
}

/// A dataset source definition, deserialized from TOML.
///
/// `F` is the field mapping for the record type the dataset produces
/// ([`StreetFieldMapping`] or [`IntersectionFieldMapping`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSource<F> {
    /// Unique source identifier (e.g. `"street_names"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Fetcher configuration.
    pub fetcher: DatasetFetcherConfig,
    /// Property names to read from each feature.
    #[serde(default)]
    pub fields: F,
}

/// Street-name index source.
pub type StreetSource = DatasetSource<StreetFieldMapping>;

/// Road-intersection index source.
pub type IntersectionSource = DatasetSource<IntersectionFieldMapping>;

/// How to fetch a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DatasetFetcherConfig {
    /// `ArcGIS` `FeatureServer` or `MapServer` query endpoint.
    ///
    /// Appends `?where=1%3D1&outFields=*&f=geojson&...` and pages with
    /// `resultOffset` while the server reports `exceededTransferLimit`.
    Arcgis {
        /// Base query URL (up to `.../query`).
        url: String,
        /// Maximum records to request per page (default: 1000).
        max_records: Option<u32>,
    },
    /// URL returning a `GeoJSON` `FeatureCollection` directly.
    GeojsonUrl {
        /// Full URL of the document.
        url: String,
    },
    /// Local `GeoJSON` `FeatureCollection` file.
    File {
        /// Path to the file, relative to the working directory.
        path: String,
    },
}

/// Property names for street segment features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreetFieldMapping {
    /// Object identifier property.
    pub object_id: String,
    /// Primary street name property.
    pub street: String,
    /// Adjacent segment (behind) property.
    pub street_behind: String,
    /// Adjacent segment (ahead) property.
    pub street_ahead: String,
    /// Status property.
    pub status: String,
    /// Owner property.
    pub owner: String,
}

impl Default for StreetFieldMapping {
    fn default() -> Self {
        Self {
            object_id: "OBJECTID".to_string(),
            street: "STREET".to_string(),
            street_behind: "STREET_BEHIND".to_string(),
            street_ahead: "STREET_AHEAD".to_string(),
            status: "STATUS".to_string(),
            owner: "OWNER".to_string(),
        }
    }
}

/// Property names for intersection features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntersectionFieldMapping {
    /// Object identifier property.
    pub object_id: String,
    /// Intersection label property.
    pub name: String,
    /// Member street properties in member order. Only the first
    /// [`MAX_INTERSECTION_MEMBERS`] are read.
    pub members: Vec<String>,
    /// Junction classification property.
    pub junction_kind: String,
}

impl Default for IntersectionFieldMapping {
    fn default() -> Self {
        Self {
            object_id: "OBJECTID".to_string(),
            name: "NAME".to_string(),
            members: vec![
                "STREET1".to_string(),
                "STREET2".to_string(),
                "STREET3".to_string(),
                "STREET4".to_string(),
            ],
            junction_kind: "JUNCTION_TYPE".to_string(),
        }
    }
}

/// Top-level resolver configuration: both dataset sources plus HTTP
/// settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Street-name index.
    pub streets: StreetSource,
    /// Road-intersection index.
    pub intersections: IntersectionSource,
}

const fn default_timeout_secs() -> u64 {
    30
}
