//! Shared fixtures for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::json;

use crate::loader::{DatasetLoader, StaticDatasetLoader};
use crate::store::StreetData;
use crate::{StreetsError, parse};

pub fn street_features() -> Vec<serde_json::Value> {
    vec![
        json!({ "properties": {
            "OBJECTID": 1, "STREET": "Main St", "STREET_BEHIND": "Pine Ave",
            "STREET_AHEAD": "Park Ave", "STATUS": "Active", "OWNER": "City",
        }}),
        json!({ "properties": {
            "OBJECTID": 2, "STREET": "Fountain Ave", "STREET_BEHIND": null,
            "STREET_AHEAD": "Main St",
        }}),
        json!({ "properties": {
            "OBJECTID": 3, "STREET": "Pine Ave", "STREET_BEHIND": "",
            "STREET_AHEAD": "Walnut Ave",
        }}),
        json!({ "properties": {
            "OBJECTID": 4, "STREET": "Niagara St", "STREET_BEHIND": "Main St",
        }}),
        json!({ "properties": { "OBJECTID": 5, "STREET": "   " }}),
    ]
}

pub fn intersection_features() -> Vec<serde_json::Value> {
    vec![
        intersection(10, "Main St & Pine Ave", &["Main St", "Pine Ave"], Some((-79.05, 43.09))),
        intersection(11, "Main St & Park Ave", &["Main St", "Park Ave"], Some((-79.09, 43.10))),
        intersection(12, "Niagara St & Main St", &["Niagara St", "Main St"], Some((-79.10, 43.11))),
        intersection(13, "Pine Ave & Walnut Ave", &["Pine Ave", "Walnut Ave"], Some((-79.0, 43.0))),
        intersection(14, "Walnut Ave & Fountain Ave", &["Walnut Ave", "Fountain Ave"], None),
    ]
}

/// Builds an intersection feature with default property names.
pub fn intersection(
    object_id: i64,
    name: &str,
    members: &[&str],
    lon_lat: Option<(f64, f64)>,
) -> serde_json::Value {
    let mut props = serde_json::Map::new();
    props.insert("OBJECTID".to_string(), json!(object_id));
    props.insert("NAME".to_string(), json!(name));
    for (i, member) in members.iter().enumerate() {
        props.insert(format!("STREET{}", i + 1), json!(member));
    }

    let geometry = lon_lat.map_or(serde_json::Value::Null, |(lon, lat)| {
        json!({ "type": "Point", "coordinates": [lon, lat] })
    });

    json!({ "type": "Feature", "properties": props, "geometry": geometry })
}

pub fn sample_loader() -> StaticDatasetLoader {
    StaticDatasetLoader::new(street_features(), intersection_features())
}

pub fn sample_data() -> StreetData {
    data_from(&street_features(), &intersection_features())
}

pub fn data_from(
    street_features: &[serde_json::Value],
    intersection_features: &[serde_json::Value],
) -> StreetData {
    StreetData::new(
        parse::parse_segments(street_features, &Default::default()),
        parse::parse_intersections(intersection_features, &Default::default()),
    )
}

/// Counts loads and widens the race window for single-flight tests.
pub struct CountingLoader<L> {
    inner: L,
    calls: Arc<AtomicUsize>,
}

impl<L> CountingLoader<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait::async_trait]
impl<L: DatasetLoader> DatasetLoader for CountingLoader<L> {
    async fn load(&self) -> Result<StreetData, StreetsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.inner.load().await
    }
}

pub struct FailingLoader;

#[async_trait::async_trait]
impl DatasetLoader for FailingLoader {
    async fn load(&self) -> Result<StreetData, StreetsError> {
        Err(StreetsError::Conversion {
            message: "No features array in ArcGIS response".to_string(),
        })
    }
}

/// Serves HTTP on a loopback port until the test ends. `respond` maps the
/// request target (path and query) to a status code and body. Returns the
/// base URL.
pub async fn serve_http<F>(respond: F) -> String
where
    F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
{
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let respond = Arc::new(respond);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let respond = Arc::clone(&respond);
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let request = String::from_utf8_lossy(&request);
                let target = request.split_whitespace().nth(1).unwrap_or("/");
                let (status, body) = respond(target);
                let response = format!(
                    "HTTP/1.1 {status} Test\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}")
}
