//! The record store: every feed table, indexed for point lookups.
//!
//! A `RecordStore` is built in one go by [`RecordStore::build`] and is
//! immutable afterwards. Refreshing the feed means building a new store and
//! swapping it in whole; nothing here is ever updated in place.

mod build;
mod report;
mod table;

use std::collections::HashMap;

use crate::domain::{
    CalendarEntry, ExceptionType, Route, ServiceDate, ShapePoint, Stop, StopTime, Trip,
};

pub use report::{LoadReport, RowCounts};
pub use table::Table;

/// Indexed, read-only view of one feed snapshot.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    routes: Table<Route>,
    stops: Table<Stop>,
    trips: Table<Trip>,

    /// Short name (train number) -> trip ids, in trip table order.
    trips_by_short_name: HashMap<String, Vec<String>>,

    /// Trip id -> stop times sorted by ascending sequence.
    stop_times: Table<Vec<StopTime>>,

    calendar: HashMap<String, CalendarEntry>,

    /// Service id -> date -> override.
    exceptions: HashMap<String, HashMap<ServiceDate, ExceptionType>>,

    /// Shape id -> points in drawing order.
    shapes: Table<Vec<ShapePoint>>,

    has_calendar_data: bool,
}

impl RecordStore {
    pub fn route(&self, id: &str) -> Option<&Route> {
        self.routes.get(id)
    }

    pub fn stop(&self, id: &str) -> Option<&Stop> {
        self.stops.get(id)
    }

    pub fn trip(&self, id: &str) -> Option<&Trip> {
        self.trips.get(id)
    }

    pub fn routes(&self) -> &Table<Route> {
        &self.routes
    }

    pub fn stops(&self) -> &Table<Stop> {
        &self.stops
    }

    pub fn trips(&self) -> &Table<Trip> {
        &self.trips
    }

    /// Trip ids published under a short name, in feed order.
    pub fn trips_by_short_name(&self, short_name: &str) -> &[String] {
        self.trips_by_short_name
            .get(short_name)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Sorted stop times of a trip; empty for an unknown trip.
    pub fn stop_times(&self, trip_id: &str) -> &[StopTime] {
        self.stop_times
            .get(trip_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Every trip's stop-time sequence, keyed by trip id.
    pub fn stop_time_groups(&self) -> &Table<Vec<StopTime>> {
        &self.stop_times
    }

    pub fn calendar_entry(&self, service_id: &str) -> Option<&CalendarEntry> {
        self.calendar.get(service_id)
    }

    /// The override recorded for a service on a date, if any.
    pub fn exception(&self, service_id: &str, date: ServiceDate) -> Option<ExceptionType> {
        self.exceptions.get(service_id)?.get(&date).copied()
    }

    pub fn shape(&self, shape_id: &str) -> Option<&[ShapePoint]> {
        self.shapes.get(shape_id).map(|v| v.as_slice())
    }

    pub fn shape_ids(&self) -> impl Iterator<Item = &str> {
        self.shapes.ids()
    }

    /// Whether any calendar entry or exception was ingested.
    pub fn has_calendar_data(&self) -> bool {
        self.has_calendar_data
    }

    /// Whether the store holds both routes and stops.
    pub fn is_loaded(&self) -> bool {
        !self.routes.is_empty() && !self.stops.is_empty()
    }
}
