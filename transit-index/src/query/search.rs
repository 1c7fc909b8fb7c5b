//! Free-text search over stations, routes, and trains.
//!
//! Search is list-building, not relevance scoring. Several matching passes
//! run in a fixed order and their results are concatenated; the order of
//! the output is the pass order, then feed order within each pass.
//! Duplicate result ids keep their first occurrence and the list is capped.

use std::collections::HashSet;

use serde::Serialize;
use tracing::trace;

use crate::domain::{Stop, TrainNumber};
use crate::store::RecordStore;

use super::config::QueryConfig;
use super::trips::stop_name_or_id;

/// What kind of thing a search result points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Station,
    Route,
    Train,
}

/// The entity a search result refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum SearchTarget {
    Stop(String),
    Route(String),
    Trip(String),
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Stable id, unique within one result list.
    pub id: String,
    pub name: String,
    /// Why this matched, for display under the name.
    pub subtitle: String,
    pub kind: ResultKind,
    pub target: SearchTarget,
}

impl SearchResult {
    fn station(stop: &Stop, subtitle: String) -> Self {
        Self {
            id: format!("station-{}", stop.id),
            name: stop.name.clone(),
            subtitle,
            kind: ResultKind::Station,
            target: SearchTarget::Stop(stop.id.clone()),
        }
    }

    fn train(id: String, name: String, subtitle: String, trip_id: &str) -> Self {
        Self {
            id,
            name,
            subtitle,
            kind: ResultKind::Train,
            target: SearchTarget::Trip(trip_id.to_string()),
        }
    }
}

/// Accumulates results, dropping repeated ids, until the cap is hit.
struct ResultList {
    results: Vec<SearchResult>,
    seen: HashSet<String>,
    cap: usize,
}

impl ResultList {
    fn new(cap: usize) -> Self {
        Self {
            results: Vec::new(),
            seen: HashSet::new(),
            cap,
        }
    }

    fn push(&mut self, result: SearchResult) {
        if self.is_full() {
            return;
        }
        if self.seen.insert(result.id.clone()) {
            self.results.push(result);
        }
    }

    fn is_full(&self) -> bool {
        self.results.len() >= self.cap
    }

    fn len(&self) -> usize {
        self.results.len()
    }
}

/// Display label for a trip: route name and train number, e.g.
/// "Cardinal 51", or "Train 51" when the route is unknown.
fn train_label(store: &RecordStore, trip_id: &str) -> String {
    let trip = store.trip(trip_id);
    let number = trip
        .map(|t| t.short_name.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(trip_id);
    match trip.and_then(|t| store.route(&t.route_id)) {
        Some(route) => format!("{} {}", route.display_name(), number),
        None => format!("Train {number}"),
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Search stations, routes, and trains for `query`.
///
/// Passes, in order:
/// 1. stations whose name contains the query;
/// 2. stations whose id contains it (only stops pass 1 missed);
/// 3. routes whose long name, short name, or id contains it;
/// 4. trips whose train number equals the number extracted from the query;
/// 5. trips calling at a stop whose display name (the stop id when the
///    stop is unknown or unnamed) contains the query, plus trips whose id
///    ends in the extracted train number.
///
/// Matching is case-insensitive. A blank query returns nothing.
pub fn search(store: &RecordStore, query: &str, config: &QueryConfig) -> Vec<SearchResult> {
    let raw = query.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    let needle = raw.to_lowercase();
    let mut list = ResultList::new(config.max_search_results);

    // Passes 1 and 2
    for stop in store.stops().values() {
        if contains_ci(&stop.name, &needle) {
            list.push(SearchResult::station(stop, "Station name match".to_string()));
        } else if contains_ci(&stop.id, &needle) {
            list.push(SearchResult::station(stop, format!("Station ID match: {}", stop.id)));
        }
    }
    trace!(query = raw, results = list.len(), "station passes done");

    // Pass 3
    for route in store.routes().values() {
        let subtitle = if contains_ci(&route.long_name, &needle) {
            "Route name match".to_string()
        } else if let Some(short) = route
            .short_name
            .as_deref()
            .filter(|s| contains_ci(s, &needle))
        {
            format!("Route short name match: {short}")
        } else if contains_ci(&route.id, &needle) {
            format!("Route ID match: {}", route.id)
        } else {
            continue;
        };
        list.push(SearchResult {
            id: format!("route-{}", route.id),
            name: route.display_name().to_string(),
            subtitle,
            kind: ResultKind::Route,
            target: SearchTarget::Route(route.id.clone()),
        });
    }
    trace!(query = raw, results = list.len(), "route pass done");

    // Pass 4
    let number = TrainNumber::extract(raw);
    if let Some(number) = &number {
        for trip_id in store
            .trips_by_short_name(number.as_str())
            .iter()
            .take(config.max_train_results)
        {
            let subtitle = match store.trip(trip_id).map(|t| t.headsign.as_str()) {
                Some(headsign) if !headsign.is_empty() => {
                    format!("Train {number} to {headsign}")
                }
                _ => format!("Train {number}"),
            };
            list.push(SearchResult::train(
                format!("train-{trip_id}"),
                train_label(store, trip_id),
                subtitle,
                trip_id,
            ));
        }
    }
    trace!(query = raw, train_number = ?number, results = list.len(), "train number pass done");

    // Pass 5
    for (trip_id, stop_times) in store.stop_time_groups().iter() {
        if list.is_full() {
            break;
        }
        if let Some(stop_name) = stop_times
            .iter()
            .map(|st| stop_name_or_id(store, &st.stop_id))
            .find(|name| contains_ci(name, &needle))
        {
            list.push(SearchResult::train(
                format!("trip-{trip_id}"),
                train_label(store, trip_id),
                format!("Stops at {stop_name}"),
                trip_id,
            ));
        }
        if number.as_ref().is_some_and(|n| n.is_suffix_of_trip_id(trip_id)) {
            list.push(SearchResult::train(
                format!("train-{trip_id}"),
                train_label(store, trip_id),
                format!("Trip ID match: {trip_id}"),
                trip_id,
            ));
        }
    }
    trace!(query = raw, results = list.len(), "trip pass done");

    list.results
}

/// Stops whose name or id contains `query`, case-insensitively, in feed
/// order. No ranking; meant for picking a single best-guess station.
pub fn search_stations(store: &RecordStore, query: &str, config: &QueryConfig) -> Vec<Stop> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    store
        .stops()
        .values()
        .filter(|stop| contains_ci(&stop.name, &needle) || contains_ci(&stop.id, &needle))
        .take(config.max_station_results)
        .cloned()
        .collect()
}
