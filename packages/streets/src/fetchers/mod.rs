//! Fetcher dispatch and implementations for the dataset source types.
//!
//! Every fetcher produces the raw `features` array of a `GeoJSON`
//! `FeatureCollection`, in document order. Record conversion happens in
//! [`crate::parse`].

pub mod arcgis;
pub mod file;
pub mod geojson_url;

use beavernet_streets_models::{DatasetFetcherConfig, DatasetSource};

use crate::StreetsError;

/// GETs `url` and parses the body as JSON.
///
/// `kind` names the service in error messages.
///
/// # Errors
///
/// Returns [`StreetsError`] if the request fails, the server answers with
/// a non-success status, or the body is not JSON.
pub async fn get_json(
    client: &reqwest::Client,
    url: &str,
    kind: &str,
) -> Result<serde_json::Value, StreetsError> {
    let resp = client.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(StreetsError::Conversion {
            message: format!("{kind} request failed with status {status}"),
        });
    }

    resp.json().await.map_err(|e| StreetsError::Conversion {
        message: format!("Failed to parse {kind} response: {e}"),
    })
}

/// Fetches raw `GeoJSON` features for a dataset source.
///
/// # Errors
///
/// Returns [`StreetsError`] if the request, file read, or response parsing
/// fails.
pub async fn fetch_features<F: Sync>(
    client: &reqwest::Client,
    source: &DatasetSource<F>,
) -> Result<Vec<serde_json::Value>, StreetsError> {
    match &source.fetcher {
        DatasetFetcherConfig::Arcgis { url, max_records } => {
            arcgis::fetch(client, url, *max_records).await
        }
        DatasetFetcherConfig::GeojsonUrl { url } => geojson_url::fetch(client, url).await,
        DatasetFetcherConfig::File { path } => file::fetch(path).await,
    }
}

/// Extracts the `features` array from a parsed `FeatureCollection`.
///
/// `kind` names the document type in the error message.
///
/// # Errors
///
/// Returns [`StreetsError::Conversion`] if the document has no `features`
/// array.
pub fn features_from_document(
    document: &serde_json::Value,
    kind: &str,
) -> Result<Vec<serde_json::Value>, StreetsError> {
    let features = document["features"]
        .as_array()
        .ok_or_else(|| StreetsError::Conversion {
            message: format!("No features array in {kind} response"),
        })?;

    Ok(features.clone())
}
