//! Trip queries: stop sequences, trips at a stop, and stop-to-stop
//! connections.
//!
//! Every function here is a pure read over one `RecordStore`. Unknown ids
//! produce empty results, never errors.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::is_service_active;
use crate::domain::{FeedTime, StopTime};
use crate::store::RecordStore;

/// A stop time enriched with its stop's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopVisit {
    pub stop_id: String,
    /// The stop's name, or its id if the stop is unknown or unnamed.
    pub stop_name: String,
    pub arrival: FeedTime,
    pub departure: FeedTime,
    pub sequence: u32,
}

impl StopVisit {
    fn new(store: &RecordStore, stop_time: &StopTime) -> Self {
        Self {
            stop_id: stop_time.stop_id.clone(),
            stop_name: stop_name_or_id(store, &stop_time.stop_id).to_string(),
            arrival: stop_time.arrival.clone(),
            departure: stop_time.departure.clone(),
            sequence: stop_time.sequence,
        }
    }
}

/// A trip that serves `from` and later `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripConnection {
    pub trip_id: String,
    pub from: StopVisit,
    pub to: StopVisit,
    /// Stops strictly between `from` and `to`, in travel order.
    pub intermediate: Vec<StopVisit>,
}

/// Display name of a stop, falling back to the id itself.
pub(crate) fn stop_name_or_id<'a>(store: &'a RecordStore, stop_id: &'a str) -> &'a str {
    store
        .stop(stop_id)
        .map(|s| s.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(stop_id)
}

/// Whether the trip's service runs on `date`. No date means no filter.
///
/// A trip with stop times but no trip record has no service id, which the
/// calendar treats as always running.
fn runs_on(store: &RecordStore, trip_id: &str, date: Option<NaiveDate>) -> bool {
    let Some(date) = date else {
        return true;
    };
    let service_id = store.trip(trip_id).map_or("", |t| t.service_id.as_str());
    is_service_active(store, service_id, date)
}

/// All stop times of a trip in ascending sequence order.
pub fn stop_times_for_trip(store: &RecordStore, trip_id: &str) -> Vec<StopVisit> {
    store
        .stop_times(trip_id)
        .iter()
        .map(|st| StopVisit::new(store, st))
        .collect()
}

/// The stops of a trip excluding its origin and terminus.
pub fn intermediate_stops(store: &RecordStore, trip_id: &str) -> Vec<StopVisit> {
    let stop_times = store.stop_times(trip_id);
    if stop_times.len() < 2 {
        return Vec::new();
    }
    stop_times[1..stop_times.len() - 1]
        .iter()
        .map(|st| StopVisit::new(store, st))
        .collect()
}

/// Ids of trips that call at `stop_id`, optionally only those running on
/// `date`. Each trip appears once, in feed order.
pub fn trips_at_stop(store: &RecordStore, stop_id: &str, date: Option<NaiveDate>) -> Vec<String> {
    store
        .stop_time_groups()
        .iter()
        .filter(|(_, stop_times)| stop_times.iter().any(|st| st.stop_id == stop_id))
        .filter(|(trip_id, _)| runs_on(store, trip_id, date))
        .map(|(trip_id, _)| trip_id.to_string())
        .collect()
}

/// Trips that call at `from_stop_id` and afterwards at `to_stop_id`.
///
/// Uses the first call at each stop; a trip qualifies only when the `from`
/// call comes earlier in sequence than the `to` call. Results are ordered by
/// departure from `from_stop_id`, and trips sharing a short name and that
/// departure time are collapsed to the first, since they are the same
/// physical run published under several calendars.
pub fn trips_connecting(
    store: &RecordStore,
    from_stop_id: &str,
    to_stop_id: &str,
    date: Option<NaiveDate>,
) -> Vec<TripConnection> {
    let mut connections: Vec<TripConnection> = store
        .stop_time_groups()
        .iter()
        .filter(|(trip_id, _)| runs_on(store, trip_id, date))
        .filter_map(|(trip_id, stop_times)| {
            let from_idx = stop_times.iter().position(|st| st.stop_id == from_stop_id)?;
            let to_idx = stop_times.iter().position(|st| st.stop_id == to_stop_id)?;
            if from_idx >= to_idx {
                return None;
            }

            Some(TripConnection {
                trip_id: trip_id.to_string(),
                from: StopVisit::new(store, &stop_times[from_idx]),
                to: StopVisit::new(store, &stop_times[to_idx]),
                intermediate: stop_times[from_idx + 1..to_idx]
                    .iter()
                    .map(|st| StopVisit::new(store, st))
                    .collect(),
            })
        })
        .collect();

    // Stable: equal departures keep feed order.
    connections.sort_by(|a, b| a.from.departure.cmp(&b.from.departure));

    // TODO: include the route id in the key once feeds that reuse a train
    // number across routes on the same day need telling apart.
    let mut seen: HashSet<(String, String)> = HashSet::new();
    connections.retain(|c| {
        let run = store
            .trip(&c.trip_id)
            .map(|t| t.short_name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(c.trip_id.as_str());
        seen.insert((run.to_string(), c.from.departure.as_str().to_string()))
    });

    connections
}
