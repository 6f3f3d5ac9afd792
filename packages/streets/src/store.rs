//! The load-once street and intersection store.
//!
//! [`StreetStore`] owns a [`DatasetLoader`] and caches the first
//! successful load as an immutable [`StreetData`] snapshot shared by all
//! readers. A separate load lock is held for the whole fetch, so concurrent
//! first callers trigger a single fetch and all observe the same outcome.
//! The snapshot itself sits behind a read-write lock that is only held
//! briefly, so [`StreetStore::stats`] never waits on a fetch.
//!
//! Failed loads are logged and answered with empty data. Callers queued
//! behind a failed attempt share its empty answer; the store stays
//! unloaded so the next call that starts afterwards retries.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use beavernet_streets_models::{AddressAnalysis, Intersection, ResolverConfig, StreetSegment};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use crate::loader::{DatasetLoader, HttpDatasetLoader};
use crate::{StreetsError, matcher, proximity, resolver};

/// Immutable street and intersection collections, in dataset load order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreetData {
    segments: Vec<StreetSegment>,
    intersections: Vec<Intersection>,
}

impl StreetData {
    /// Creates a snapshot from parsed records.
    #[must_use]
    pub const fn new(segments: Vec<StreetSegment>, intersections: Vec<Intersection>) -> Self {
        Self {
            segments,
            intersections,
        }
    }

    /// Street segments in load order.
    #[must_use]
    pub fn segments(&self) -> &[StreetSegment] {
        &self.segments
    }

    /// Intersections in load order.
    #[must_use]
    pub fn intersections(&self) -> &[Intersection] {
        &self.intersections
    }

    /// Returns `true` if both collections are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.intersections.is_empty()
    }

    /// Iterates every non-blank known street name: each segment's
    /// `street`, `street_behind`, `street_ahead`, then each intersection's
    /// members. Names repeat as often as they occur.
    pub fn street_names(&self) -> impl Iterator<Item = &str> {
        let segment_names = self.segments.iter().flat_map(|segment| segment.names());
        let member_names = self
            .intersections
            .iter()
            .flat_map(|intersection| intersection.members.iter().map(String::as_str))
            .filter(|name| !name.trim().is_empty());

        segment_names.chain(member_names)
    }
}

/// Load state and record counts, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    /// Whether a snapshot is cached.
    pub loaded: bool,
    /// Cached street segment count.
    pub segment_count: usize,
    /// Cached intersection count.
    pub intersection_count: usize,
}

/// Lazily-loaded, shared street and intersection store.
///
/// Construct one per composing component and share it behind an `Arc`.
pub struct StreetStore {
    loader: Box<dyn DatasetLoader>,
    data: RwLock<Option<Arc<StreetData>>>,
    load_lock: Mutex<()>,
    attempts: AtomicU64,
}

impl StreetStore {
    /// Creates an unloaded store over `loader`.
    #[must_use]
    pub fn new(loader: impl DatasetLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            data: RwLock::new(None),
            load_lock: Mutex::new(()),
            attempts: AtomicU64::new(0),
        }
    }

    /// Creates an unloaded store fetching through the configured sources.
    ///
    /// # Errors
    ///
    /// Returns [`StreetsError`] if the HTTP client cannot be built.
    pub fn from_config(config: ResolverConfig) -> Result<Self, StreetsError> {
        Ok(Self::new(HttpDatasetLoader::new(config)?))
    }

    /// Returns the cached snapshot, loading it first if needed.
    ///
    /// Never fails: a load error is logged and an empty snapshot is
    /// returned without being cached. Callers that were waiting on the
    /// failed attempt get the same empty snapshot instead of fetching
    /// again.
    pub async fn ensure_loaded(&self) -> Arc<StreetData> {
        if let Some(data) = self.cached().await {
            return data;
        }

        let attempts_seen = self.attempts.load(Ordering::SeqCst);
        let _load = self.load_lock.lock().await;

        if let Some(data) = self.cached().await {
            return data;
        }
        if self.attempts.load(Ordering::SeqCst) != attempts_seen {
            log::debug!("Street dataset load failed while waiting, not refetching");
            return Arc::new(StreetData::default());
        }

        let result = self.loader.load().await;
        self.attempts.fetch_add(1, Ordering::SeqCst);

        match result {
            Ok(data) => {
                log::info!(
                    "Loaded {} street segments and {} intersections",
                    data.segments().len(),
                    data.intersections().len()
                );
                let data = Arc::new(data);
                *self.data.write().await = Some(Arc::clone(&data));
                data
            }
            Err(e) => {
                log::warn!("Failed to load street datasets, continuing without suggestions: {e}");
                Arc::new(StreetData::default())
            }
        }
    }

    async fn cached(&self) -> Option<Arc<StreetData>> {
        self.data.read().await.as_ref().map(Arc::clone)
    }

    /// Returns `true` if a snapshot is cached. Does not wait on an
    /// in-flight load.
    pub async fn is_loaded(&self) -> bool {
        self.data.read().await.is_some()
    }

    /// Drops the cached snapshot so the next call loads again.
    pub async fn reset(&self) {
        *self.data.write().await = None;
        log::debug!("Street store reset");
    }

    /// Drops the cached snapshot and loads a fresh one.
    pub async fn reload(&self) -> Arc<StreetData> {
        self.reset().await;
        self.ensure_loaded().await
    }

    /// Returns load state and record counts without triggering or waiting
    /// on a load.
    pub async fn stats(&self) -> StoreStats {
        self.cached().await.map_or(
            StoreStats {
                loaded: false,
                segment_count: 0,
                intersection_count: 0,
            },
            |data| StoreStats {
                loaded: true,
                segment_count: data.segments().len(),
                intersection_count: data.intersections().len(),
            },
        )
    }

    /// Street names containing `query`. See [`matcher::search_streets`].
    pub async fn search_streets(&self, query: &str) -> Vec<String> {
        if !matcher::is_searchable(query) {
            return Vec::new();
        }
        let data = self.ensure_loaded().await;
        matcher::search_streets(&data, query)
    }

    /// Streets, intersections, and cross street referenced by `address`.
    /// See [`resolver::analyze_address`].
    pub async fn analyze_address(&self, address: &str) -> AddressAnalysis {
        if address.trim().is_empty() {
            return AddressAnalysis::default();
        }
        let data = self.ensure_loaded().await;
        resolver::analyze_address(&data, address)
    }

    /// Intersections having `street_name` as a member. See
    /// [`resolver::find_intersections_for_street`].
    pub async fn find_intersections_for_street(&self, street_name: &str) -> Vec<Intersection> {
        if street_name.trim().is_empty() {
            return Vec::new();
        }
        let data = self.ensure_loaded().await;
        resolver::find_intersections_for_street(&data, street_name)
    }

    /// Nearest intersection within `max_distance` degrees. See
    /// [`proximity::find_closest_intersection`].
    pub async fn find_closest_intersection(
        &self,
        latitude: f64,
        longitude: f64,
        max_distance: f64,
    ) -> Option<Intersection> {
        if !proximity::is_valid_query(latitude, longitude, max_distance) {
            return None;
        }
        let data = self.ensure_loaded().await;
        proximity::find_closest_intersection(&data, latitude, longitude, max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CountingLoader, FailingLoader, sample_loader};

    #[tokio::test]
    async fn loads_lazily_and_only_once() {
        let loader = CountingLoader::new(sample_loader());
        let calls = loader.calls();
        let store = StreetStore::new(loader);

        assert!(!store.is_loaded().await);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);

        let first = store.ensure_loaded().await;
        let second = store.ensure_loaded().await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert!(store.is_loaded().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_calls_fetch_once() {
        let loader = CountingLoader::new(sample_loader());
        let calls = loader.calls();
        let store = Arc::new(StreetStore::new(loader));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.ensure_loaded().await })
            })
            .collect();

        for handle in handles {
            let data = handle.await.unwrap();
            assert!(!data.is_empty());
        }

        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_load_yields_empty_results_and_retries() {
        let loader = CountingLoader::new(FailingLoader);
        let calls = loader.calls();
        let store = StreetStore::new(loader);

        assert!(store.search_streets("main").await.is_empty());
        assert_eq!(
            store.analyze_address("123 Main St near Park Ave").await,
            AddressAnalysis::default()
        );
        assert!(store.find_closest_intersection(43.10, -79.09, 0.01).await.is_none());
        assert!(!store.is_loaded().await);

        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_share_a_failed_attempt() {
        let loader = CountingLoader::new(FailingLoader);
        let calls = loader.calls();
        let store = Arc::new(StreetStore::new(loader));
        let barrier = Arc::new(tokio::sync::Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                tokio::spawn(async move {
                    barrier.wait().await;
                    store.search_streets("main").await
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_empty());
        }
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert!(!store.is_loaded().await);

        // A call starting after the failure retries
        assert!(store.search_streets("main").await.is_empty());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn stats_do_not_wait_on_an_inflight_load() {
        let loader = CountingLoader::new(sample_loader());
        let calls = loader.calls();
        let store = Arc::new(StreetStore::new(loader));

        let loading = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.ensure_loaded().await })
        };
        while calls.load(std::sync::atomic::Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let stats = tokio::time::timeout(std::time::Duration::from_millis(5), store.stats())
            .await
            .expect("stats should not block on the load");
        assert!(!stats.loaded);
        assert!(
            !tokio::time::timeout(std::time::Duration::from_millis(5), store.is_loaded())
                .await
                .unwrap()
        );

        assert!(!loading.await.unwrap().is_empty());
        assert!(store.stats().await.loaded);
    }

    #[tokio::test]
    async fn reset_forces_refetch() {
        let loader = CountingLoader::new(sample_loader());
        let calls = loader.calls();
        let store = StreetStore::new(loader);

        store.ensure_loaded().await;
        store.reset().await;
        assert!(!store.is_loaded().await);

        store.ensure_loaded().await;
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);

        store.reload().await;
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stats_do_not_trigger_load() {
        let loader = CountingLoader::new(sample_loader());
        let calls = loader.calls();
        let store = StreetStore::new(loader);

        let stats = store.stats().await;
        assert!(!stats.loaded);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);

        let data = store.ensure_loaded().await;
        let stats = store.stats().await;
        assert!(stats.loaded);
        assert_eq!(stats.segment_count, data.segments().len());
        assert_eq!(stats.intersection_count, data.intersections().len());
    }

    #[tokio::test]
    async fn invalid_input_skips_loading() {
        let loader = CountingLoader::new(sample_loader());
        let calls = loader.calls();
        let store = StreetStore::new(loader);

        assert!(store.search_streets(" m ").await.is_empty());
        assert_eq!(store.analyze_address("   ").await, AddressAnalysis::default());
        assert!(store.find_intersections_for_street("").await.is_empty());
        assert!(
            store
                .find_closest_intersection(f64::NAN, -79.09, 0.01)
                .await
                .is_none()
        );

        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn answers_address_entry_scenarios() {
        let store = StreetStore::new(sample_loader());

        let analysis = store.analyze_address("123 Main St near Park Ave").await;
        assert_eq!(analysis.detected_streets, vec!["Main St", "Park Ave"]);
        assert_eq!(analysis.cross_street.as_deref(), Some("Park Ave"));

        let closest = store
            .find_closest_intersection(43.1001, -79.0901, 0.01)
            .await
            .unwrap();
        assert_eq!(closest.name.as_deref(), Some("Main St & Park Ave"));

        assert_eq!(
            store.search_streets("ain").await,
            vec!["Fountain Ave", "Main St"]
        );
    }

    #[test]
    fn street_names_cover_segments_then_members() {
        let data = StreetData::new(
            vec![StreetSegment {
                object_id: Some(1),
                street: Some("Main St".to_string()),
                street_behind: None,
                street_ahead: Some("Oak St".to_string()),
                status: None,
                owner: None,
            }],
            vec![Intersection {
                object_id: Some(2),
                name: None,
                members: vec!["Pine St".to_string(), " ".to_string()],
                coordinates: None,
                junction_kind: None,
            }],
        );

        let names: Vec<&str> = data.street_names().collect();
        assert_eq!(names, vec!["Main St", "Oak St", "Pine St"]);
    }
}
