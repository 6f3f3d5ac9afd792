//! Direct `GeoJSON` URL fetcher, for layers published as a static export.

use crate::StreetsError;

/// Fetches all features from a URL serving a `FeatureCollection`.
///
/// # Errors
///
/// Returns [`StreetsError`] if the request fails or the response is not
/// a `FeatureCollection`.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<serde_json::Value>, StreetsError> {
    log::debug!("Fetching GeoJSON from {url}");
    let document = super::get_json(client, url, "GeoJSON").await?;
    super::features_from_document(&document, "GeoJSON")
}
