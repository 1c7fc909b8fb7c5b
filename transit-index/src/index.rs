//! The transit index: an owned, reloadable query engine.
//!
//! `TransitIndex` holds the current record store behind an atomically
//! swappable handle. A load builds the replacement store off to the side
//! and publishes it with a single pointer swap, so readers only ever see a
//! complete store: the old one or the new one, never a mix.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::calendar;
use crate::domain::{Route, ShapePoint, Stop, Trip};
use crate::feed::FeedSnapshot;
use crate::query::{self, QueryConfig, SearchResult, StopVisit, TripConnection};
use crate::store::{LoadReport, RecordStore};

/// Display name used when a route id is unknown.
pub const UNKNOWN_ROUTE: &str = "Unknown Route";

/// Error from the transit index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// No load transaction has completed yet
    #[error("transit index has not been loaded")]
    NotLoaded,
}

/// One published store together with the report of the load that built it.
///
/// Immutable once published; queries hold an `Arc` to it for their whole
/// duration.
#[derive(Debug, Default)]
pub struct Snapshot {
    store: RecordStore,
    report: LoadReport,
}

impl Snapshot {
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Both routes and stops are present.
    pub fn is_loaded(&self) -> bool {
        self.report.loaded
    }
}

/// Thread-safe transit schedule index.
///
/// Starts empty. Any number of threads may query concurrently while one
/// thread calls [`TransitIndex::load`]; each query runs against whichever
/// snapshot was current when it started.
pub struct TransitIndex {
    /// `None` until the first load transaction completes.
    current: RwLock<Option<Arc<Snapshot>>>,
    /// Served to queries before the first load.
    empty: Arc<Snapshot>,
    config: QueryConfig,
}

impl Default for TransitIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitIndex {
    /// Create an empty, unloaded index with default query limits.
    pub fn new() -> Self {
        Self::with_config(QueryConfig::default())
    }

    /// Create an empty, unloaded index with the given query limits.
    pub fn with_config(config: QueryConfig) -> Self {
        Self {
            current: RwLock::new(None),
            empty: Arc::new(Snapshot::default()),
            config,
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Replace the whole store with one built from `snapshot`.
    ///
    /// Never fails; malformed rows are dropped and counted in the returned
    /// report. The write lock is held only for the final swap.
    pub fn load(&self, snapshot: FeedSnapshot) -> LoadReport {
        let (store, report) = RecordStore::build(snapshot);

        info!(
            routes = store.routes().len(),
            stops = store.stops().len(),
            trips = store.trips().len(),
            trips_with_stop_times = store.stop_time_groups().len(),
            skipped = report.total_skipped(),
            loaded = report.loaded,
            has_calendar_data = report.has_calendar_data,
            "feed loaded"
        );
        if !report.loaded {
            warn!("feed has no routes or no stops; index reports not loaded");
        }

        let published = Arc::new(Snapshot {
            store,
            report: report.clone(),
        });
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(published);

        report
    }

    /// The currently published snapshot, or an empty one before the first
    /// load.
    pub fn current(&self) -> Arc<Snapshot> {
        self.snapshot().unwrap_or_else(|_| Arc::clone(&self.empty))
    }

    /// The currently published snapshot, or `NotLoaded` if no load has
    /// completed yet.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>, IndexError> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        guard.as_ref().map(Arc::clone).ok_or(IndexError::NotLoaded)
    }

    /// Whether the current snapshot holds both routes and stops.
    pub fn is_loaded(&self) -> bool {
        self.current().is_loaded()
    }

    /// Report of the load that built the current snapshot.
    pub fn last_report(&self) -> LoadReport {
        self.current().report.clone()
    }

    // Entity lookups

    pub fn route(&self, route_id: &str) -> Option<Route> {
        self.current().store.route(route_id).cloned()
    }

    pub fn stop(&self, stop_id: &str) -> Option<Stop> {
        self.current().store.stop(stop_id).cloned()
    }

    pub fn trip(&self, trip_id: &str) -> Option<Trip> {
        self.current().store.trip(trip_id).cloned()
    }

    /// Route display name, or [`UNKNOWN_ROUTE`] if the id is unknown.
    pub fn route_name(&self, route_id: &str) -> String {
        self.current()
            .store
            .route(route_id)
            .map_or_else(|| UNKNOWN_ROUTE.to_string(), |r| r.display_name().to_string())
    }

    /// Stop display name, or the id itself if the id is unknown.
    pub fn stop_name(&self, stop_id: &str) -> String {
        self.current()
            .store
            .stop(stop_id)
            .map(|s| s.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| stop_id.to_string())
    }

    pub fn routes(&self) -> Vec<Route> {
        self.current().store.routes().values().cloned().collect()
    }

    pub fn stops(&self) -> Vec<Stop> {
        self.current().store.stops().values().cloned().collect()
    }

    pub fn trips(&self) -> Vec<Trip> {
        self.current().store.trips().values().cloned().collect()
    }

    pub fn trip_ids(&self) -> Vec<String> {
        self.current()
            .store
            .trips()
            .ids()
            .map(str::to_string)
            .collect()
    }

    /// Trip ids published under a train number.
    pub fn trips_by_short_name(&self, short_name: &str) -> Vec<String> {
        self.current().store.trips_by_short_name(short_name).to_vec()
    }

    pub fn shape(&self, shape_id: &str) -> Option<Vec<ShapePoint>> {
        self.current().store.shape(shape_id).map(<[ShapePoint]>::to_vec)
    }

    pub fn shape_ids(&self) -> Vec<String> {
        self.current()
            .store
            .shape_ids()
            .map(str::to_string)
            .collect()
    }

    // Queries

    pub fn is_service_active_on_date(&self, service_id: &str, date: NaiveDate) -> bool {
        calendar::is_service_active(&self.current().store, service_id, date)
    }

    pub fn trips_for_stop(&self, stop_id: &str, date: Option<NaiveDate>) -> Vec<String> {
        query::trips_at_stop(&self.current().store, stop_id, date)
    }

    pub fn stop_times_for_trip(&self, trip_id: &str) -> Vec<StopVisit> {
        query::stop_times_for_trip(&self.current().store, trip_id)
    }

    pub fn intermediate_stops(&self, trip_id: &str) -> Vec<StopVisit> {
        query::intermediate_stops(&self.current().store, trip_id)
    }

    pub fn find_trips_with_stops(
        &self,
        from_stop_id: &str,
        to_stop_id: &str,
        date: Option<NaiveDate>,
    ) -> Vec<TripConnection> {
        query::trips_connecting(&self.current().store, from_stop_id, to_stop_id, date)
    }

    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        query::search(&self.current().store, query, &self.config)
    }

    pub fn search_stations(&self, query: &str) -> Vec<Stop> {
        query::search_stations(&self.current().store, query, &self.config)
    }
}
