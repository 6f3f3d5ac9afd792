//! Local `GeoJSON` file fetcher.
//!
//! Reads a `FeatureCollection` exported to disk, for offline use and for
//! deployments that mirror the municipal layers locally.

use crate::StreetsError;

/// Reads all features from a local `GeoJSON` file.
///
/// # Errors
///
/// Returns [`StreetsError`] if the file cannot be read or does not
/// contain a `FeatureCollection`.
pub async fn fetch(path: &str) -> Result<Vec<serde_json::Value>, StreetsError> {
    log::debug!("Reading GeoJSON from {path}");

    let body = tokio::fs::read_to_string(path).await?;
    let json: serde_json::Value = serde_json::from_str(&body)?;

    super::features_from_document(&json, "GeoJSON file")
}
