//! Dataset loaders feeding the [`StreetStore`](crate::StreetStore).
//!
//! A [`DatasetLoader`] produces a complete [`StreetData`] snapshot or an
//! error. The store decides what to do with failures; loaders just report
//! them.

use std::time::Duration;

use beavernet_streets_models::{IntersectionFieldMapping, ResolverConfig, StreetFieldMapping};

use crate::StreetsError;
use crate::fetchers;
use crate::parse;
use crate::store::StreetData;

/// Source of the street and intersection datasets.
#[async_trait::async_trait]
pub trait DatasetLoader: Send + Sync {
    /// Fetches and parses both datasets.
    ///
    /// # Errors
    ///
    /// Returns [`StreetsError`] if either dataset cannot be fetched or
    /// parsed.
    async fn load(&self) -> Result<StreetData, StreetsError>;
}

/// Loads both datasets through the configured fetchers (`ArcGIS`, `GeoJSON`
/// URL, or local file).
pub struct HttpDatasetLoader {
    client: reqwest::Client,
    config: ResolverConfig,
}

impl HttpDatasetLoader {
    /// Creates a loader with an HTTP client using the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`StreetsError::Http`] if the HTTP client cannot be built.
    pub fn new(config: ResolverConfig) -> Result<Self, StreetsError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a loader that shares an existing HTTP client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client, config: ResolverConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait::async_trait]
impl DatasetLoader for HttpDatasetLoader {
    async fn load(&self) -> Result<StreetData, StreetsError> {
        let streets = &self.config.streets;
        let intersections = &self.config.intersections;

        log::info!(
            "Fetching datasets {} ({}) and {} ({})",
            streets.id,
            streets.name,
            intersections.id,
            intersections.name,
        );

        let (street_features, intersection_features) = tokio::try_join!(
            fetchers::fetch_features(&self.client, streets),
            fetchers::fetch_features(&self.client, intersections),
        )?;

        Ok(StreetData::new(
            parse::parse_segments(&street_features, &streets.fields),
            parse::parse_intersections(&intersection_features, &intersections.fields),
        ))
    }
}

/// Serves pre-fetched raw features, parsing them on every load.
///
/// Used for offline runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticDatasetLoader {
    street_features: Vec<serde_json::Value>,
    intersection_features: Vec<serde_json::Value>,
    street_fields: StreetFieldMapping,
    intersection_fields: IntersectionFieldMapping,
}

impl StaticDatasetLoader {
    /// Creates a loader over raw features using the default field
    /// mappings.
    #[must_use]
    pub fn new(
        street_features: Vec<serde_json::Value>,
        intersection_features: Vec<serde_json::Value>,
    ) -> Self {
        Self {
            street_features,
            intersection_features,
            ..Self::default()
        }
    }

    /// Overrides the field mappings used to parse the features.
    #[must_use]
    pub fn with_fields(
        mut self,
        street_fields: StreetFieldMapping,
        intersection_fields: IntersectionFieldMapping,
    ) -> Self {
        self.street_fields = street_fields;
        self.intersection_fields = intersection_fields;
        self
    }
}

#[async_trait::async_trait]
impl DatasetLoader for StaticDatasetLoader {
    async fn load(&self) -> Result<StreetData, StreetsError> {
        Ok(StreetData::new(
            parse::parse_segments(&self.street_features, &self.street_fields),
            parse::parse_intersections(&self.intersection_features, &self.intersection_fields),
        ))
    }
}
