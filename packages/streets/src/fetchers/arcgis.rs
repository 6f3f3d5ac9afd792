//! `ArcGIS` `FeatureServer` / `MapServer` query fetcher.
//!
//! Layers larger than the server's transfer limit come back in pages. Each
//! page is requested with `resultOffset` advanced by the number of records
//! the previous page actually returned, and pages are appended in offset
//! order so the dataset keeps the server's record order.

use serde_json::Value;

use crate::StreetsError;

/// Page size when the source does not set `max_records`.
const DEFAULT_PAGE_SIZE: u32 = 1000;

fn page_url(base_url: &str, record_count: u32, offset: u32) -> String {
    format!(
        "{base_url}?where=1%3D1&outFields=*&f=geojson&returnGeometry=true\
         &resultRecordCount={record_count}&resultOffset={offset}"
    )
}

/// Fails if `page` is an `ArcGIS` error body. Query errors are reported
/// with a 200 status and an `error` object instead of features.
fn check_error(page: &Value) -> Result<(), StreetsError> {
    let Some(error) = page.get("error") else {
        return Ok(());
    };

    let message = error["message"].as_str().unwrap_or("unknown error");
    let code = error["code"]
        .as_i64()
        .map_or_else(String::new, |code| format!(" ({code})"));

    Err(StreetsError::Conversion {
        message: format!("ArcGIS API error{code}: {message}"),
    })
}

/// Offset of the page after one that returned `page_len` records at
/// `offset`, or `None` if `page` was the last one.
fn next_offset(page: &Value, page_len: usize, offset: u32) -> Option<u32> {
    if page_len == 0 || !page["exceededTransferLimit"].as_bool().unwrap_or(false) {
        return None;
    }
    u32::try_from(page_len)
        .ok()
        .and_then(|len| offset.checked_add(len))
}

/// Fetches every feature from an `ArcGIS` layer query endpoint.
///
/// # Errors
///
/// Returns [`StreetsError`] if any page request fails, a page is an
/// `ArcGIS` error body, or a page has no `features` array.
pub async fn fetch(
    client: &reqwest::Client,
    base_url: &str,
    max_records: Option<u32>,
) -> Result<Vec<Value>, StreetsError> {
    let record_count = max_records.unwrap_or(DEFAULT_PAGE_SIZE);
    let mut features = Vec::new();
    let mut offset = Some(0);

    while let Some(current) = offset {
        log::debug!("Fetching ArcGIS page at offset {current}: {base_url}");
        let page = super::get_json(client, &page_url(base_url, record_count, current), "ArcGIS")
            .await?;
        check_error(&page)?;

        let page_features = super::features_from_document(&page, "ArcGIS")?;
        offset = next_offset(&page, page_features.len(), current);
        features.extend(page_features);
    }

    log::debug!("Fetched {} ArcGIS features from {base_url}", features.len());

    Ok(features)
}
