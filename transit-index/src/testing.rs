//! Feed fixtures for unit tests.

use crate::feed::{
    CalendarDateRecord, CalendarRecord, FeedSnapshot, RouteRecord, StopRecord, StopTimeRecord,
    TripRecord,
};
use crate::store::RecordStore;

/// Builds small feed snapshots in code.
#[derive(Default)]
pub struct FeedBuilder {
    snapshot: FeedSnapshot,
}

impl FeedBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, id: &str, long_name: &str, short_name: Option<&str>) -> Self {
        self.snapshot.routes.push(RouteRecord {
            route_id: Some(id.to_string()),
            route_long_name: Some(long_name.to_string()),
            route_short_name: short_name.map(str::to_string),
        });
        self
    }

    pub fn stop(mut self, id: &str, name: &str) -> Self {
        self.snapshot.stops.push(StopRecord {
            stop_id: Some(id.to_string()),
            stop_name: Some(name.to_string()),
            stop_lat: Some(40.0),
            stop_lon: Some(-75.0),
        });
        self
    }

    pub fn trip(mut self, id: &str, route_id: &str, short_name: &str, service_id: &str) -> Self {
        self.snapshot.trips.push(TripRecord {
            trip_id: Some(id.to_string()),
            route_id: Some(route_id.to_string()),
            trip_short_name: Some(short_name.to_string()),
            trip_headsign: Some("Somewhere".to_string()),
            service_id: Some(service_id.to_string()),
        });
        self
    }

    /// Stop times as `(stop_id, sequence, arrival, departure)`.
    pub fn stop_times(mut self, trip_id: &str, calls: &[(&str, u32, &str, &str)]) -> Self {
        let rows = calls
            .iter()
            .map(|(stop_id, seq, arr, dep)| StopTimeRecord {
                stop_id: Some(stop_id.to_string()),
                arrival_time: Some(arr.to_string()),
                departure_time: Some(dep.to_string()),
                stop_sequence: Some(*seq),
            })
            .collect();
        self.snapshot.stop_times.push((trip_id.to_string(), rows));
        self
    }

    /// Calendar entry with Sunday-first weekday flags.
    pub fn calendar(mut self, service_id: &str, days: [bool; 7], start: &str, end: &str) -> Self {
        let [sunday, monday, tuesday, wednesday, thursday, friday, saturday] = days;
        self.snapshot.calendar.push(CalendarRecord {
            service_id: Some(service_id.to_string()),
            sunday,
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
        });
        self
    }

    pub fn exception(mut self, service_id: &str, date: &str, code: u8) -> Self {
        self.snapshot.calendar_dates.push(CalendarDateRecord {
            service_id: Some(service_id.to_string()),
            date: Some(date.to_string()),
            exception_type: Some(code),
        });
        self
    }

    pub fn snapshot(self) -> FeedSnapshot {
        self.snapshot
    }

    pub fn build(self) -> RecordStore {
        RecordStore::build(self.snapshot).0
    }
}
