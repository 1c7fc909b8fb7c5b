//! Building a record store from a feed snapshot.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{
    CalendarEntry, DomainError, ExceptionType, FeedTime, Route, ServiceDate, ShapePoint, Stop,
    StopTime, Trip, WeekdayMask,
};
use crate::feed::{
    CalendarDateRecord, CalendarRecord, FeedSnapshot, RouteRecord, ShapePointRecord, StopRecord,
    StopTimeRecord, TripRecord,
};

use super::{LoadReport, RecordStore};

impl RecordStore {
    /// Build a complete store from a snapshot.
    ///
    /// Never fails: rows missing an identifying key or carrying unparseable
    /// calendar data are dropped, logged at debug level, and counted in the
    /// returned report.
    pub fn build(snapshot: FeedSnapshot) -> (Self, LoadReport) {
        let mut store = RecordStore::default();
        let mut report = LoadReport::default();

        for record in snapshot.routes {
            match Route::try_from(record) {
                Ok(route) => {
                    report.routes.keep();
                    store.routes.insert(route.id.clone(), route);
                }
                Err(e) => {
                    report.routes.skip();
                    debug!(table = "routes", error = %e, "skipping feed row");
                }
            }
        }

        for record in snapshot.stops {
            match Stop::try_from(record) {
                Ok(stop) => {
                    report.stops.keep();
                    store.stops.insert(stop.id.clone(), stop);
                }
                Err(e) => {
                    report.stops.skip();
                    debug!(table = "stops", error = %e, "skipping feed row");
                }
            }
        }

        for record in snapshot.trips {
            match Trip::try_from(record) {
                Ok(trip) => {
                    report.trips.keep();
                    store.trips.insert(trip.id.clone(), trip);
                }
                Err(e) => {
                    report.trips.skip();
                    debug!(table = "trips", error = %e, "skipping feed row");
                }
            }
        }

        // Built after all trips so a replaced duplicate trip id leaves no
        // stale entry behind.
        for trip in store.trips.values() {
            if trip.short_name.is_empty() {
                continue;
            }
            store
                .trips_by_short_name
                .entry(trip.short_name.clone())
                .or_default()
                .push(trip.id.clone());
        }

        for (trip_id, records) in snapshot.stop_times {
            if trip_id.trim().is_empty() {
                report.stop_times.skipped += records.len();
                debug!(
                    table = "stop_times",
                    rows = records.len(),
                    "skipping stop times with no trip id"
                );
                continue;
            }

            let stop_times = sorted_stop_times(&trip_id, records, &mut report);
            if !stop_times.is_empty() {
                store.stop_times.insert(trip_id, stop_times);
            }
        }

        for (shape_id, records) in snapshot.shapes {
            let points = shape_points(&shape_id, records, &mut report);
            if !shape_id.trim().is_empty() && !points.is_empty() {
                store.shapes.insert(shape_id, points);
            }
        }

        for record in snapshot.calendar {
            match CalendarEntry::try_from(record) {
                Ok(entry) => {
                    report.calendar.keep();
                    store.calendar.insert(entry.service_id.clone(), entry);
                }
                Err(e) => {
                    report.calendar.skip();
                    debug!(table = "calendar", error = %e, "skipping feed row");
                }
            }
        }

        for record in snapshot.calendar_dates {
            match calendar_exception(record) {
                Ok((service_id, date, kind)) => {
                    report.calendar_dates.keep();
                    store
                        .exceptions
                        .entry(service_id)
                        .or_insert_with(HashMap::new)
                        .insert(date, kind);
                }
                Err(e) => {
                    report.calendar_dates.skip();
                    debug!(table = "calendar_dates", error = %e, "skipping feed row");
                }
            }
        }

        store.has_calendar_data = report.calendar.loaded > 0 || report.calendar_dates.loaded > 0;

        report.loaded = store.is_loaded();
        report.has_calendar_data = store.has_calendar_data;

        (store, report)
    }
}

/// Validate, sort by sequence, and drop repeated sequence numbers.
fn sorted_stop_times(
    trip_id: &str,
    records: Vec<StopTimeRecord>,
    report: &mut LoadReport,
) -> Vec<StopTime> {
    let mut stop_times = Vec::with_capacity(records.len());
    for record in records {
        match StopTime::try_from(record) {
            Ok(st) => stop_times.push(st),
            Err(e) => {
                report.stop_times.skip();
                debug!(table = "stop_times", trip_id, error = %e, "skipping feed row");
            }
        }
    }

    // Stable, so the first row listed for a sequence number wins.
    stop_times.sort_by_key(|st| st.sequence);

    let before = stop_times.len();
    stop_times.dedup_by(|later, earlier| {
        if later.sequence == earlier.sequence {
            debug!(
                table = "stop_times",
                trip_id,
                error = %DomainError::DuplicateSequence(later.sequence),
                "skipping feed row"
            );
            true
        } else {
            false
        }
    });
    report.stop_times.skipped += before - stop_times.len();
    report.stop_times.loaded += stop_times.len();

    stop_times
}

fn shape_points(
    shape_id: &str,
    records: Vec<ShapePointRecord>,
    report: &mut LoadReport,
) -> Vec<ShapePoint> {
    if shape_id.trim().is_empty() {
        report.shape_points.skipped += records.len();
        debug!(table = "shapes", rows = records.len(), "skipping shape with no id");
        return Vec::new();
    }

    records
        .into_iter()
        .filter_map(|record| match (record.shape_pt_lat, record.shape_pt_lon) {
            (Some(lat), Some(lon)) => {
                report.shape_points.keep();
                Some(ShapePoint { lat, lon })
            }
            _ => {
                report.shape_points.skip();
                debug!(table = "shapes", shape_id, "skipping point without coordinates");
                None
            }
        })
        .collect()
}

fn calendar_exception(
    record: CalendarDateRecord,
) -> Result<(String, ServiceDate, ExceptionType), DomainError> {
    let service_id = required(record.service_id, "service_id")?;
    let date = ServiceDate::parse(&required(record.date, "date")?)?;
    let code = record
        .exception_type
        .ok_or(DomainError::MissingKey("exception_type"))?;
    Ok((service_id, date, ExceptionType::try_from(code)?))
}

/// Returns the value if present and not blank.
fn required(value: Option<String>, key: &'static str) -> Result<String, DomainError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(DomainError::MissingKey(key))
}

impl TryFrom<RouteRecord> for Route {
    type Error = DomainError;

    fn try_from(record: RouteRecord) -> Result<Self, Self::Error> {
        Ok(Route {
            id: required(record.route_id, "route_id")?,
            long_name: record.route_long_name.unwrap_or_default(),
            short_name: record.route_short_name,
        })
    }
}

impl TryFrom<StopRecord> for Stop {
    type Error = DomainError;

    fn try_from(record: StopRecord) -> Result<Self, Self::Error> {
        Ok(Stop {
            id: required(record.stop_id, "stop_id")?,
            name: record.stop_name.unwrap_or_default(),
            lat: record.stop_lat.unwrap_or_default(),
            lon: record.stop_lon.unwrap_or_default(),
        })
    }
}

impl TryFrom<TripRecord> for Trip {
    type Error = DomainError;

    fn try_from(record: TripRecord) -> Result<Self, Self::Error> {
        Ok(Trip {
            id: required(record.trip_id, "trip_id")?,
            route_id: record.route_id.unwrap_or_default(),
            short_name: record.trip_short_name.unwrap_or_default(),
            headsign: record.trip_headsign.unwrap_or_default(),
            service_id: record.service_id.unwrap_or_default(),
        })
    }
}

impl TryFrom<StopTimeRecord> for StopTime {
    type Error = DomainError;

    fn try_from(record: StopTimeRecord) -> Result<Self, Self::Error> {
        Ok(StopTime {
            stop_id: required(record.stop_id, "stop_id")?,
            arrival: FeedTime::from_feed(record.arrival_time.unwrap_or_default()),
            departure: FeedTime::from_feed(record.departure_time.unwrap_or_default()),
            sequence: record
                .stop_sequence
                .ok_or(DomainError::MissingKey("stop_sequence"))?,
        })
    }
}

impl TryFrom<CalendarRecord> for CalendarEntry {
    type Error = DomainError;

    fn try_from(record: CalendarRecord) -> Result<Self, Self::Error> {
        let days = WeekdayMask::from_sunday_first(record.days_sunday_first());
        Ok(CalendarEntry {
            service_id: required(record.service_id, "service_id")?,
            start_date: ServiceDate::parse(&required(record.start_date, "start_date")?)?,
            end_date: ServiceDate::parse(&required(record.end_date, "end_date")?)?,
            days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(id: &str, name: &str) -> RouteRecord {
        RouteRecord {
            route_id: Some(id.to_string()),
            route_long_name: Some(name.to_string()),
            route_short_name: None,
        }
    }

    fn stop(id: &str, name: &str) -> StopRecord {
        StopRecord {
            stop_id: Some(id.to_string()),
            stop_name: Some(name.to_string()),
            stop_lat: Some(1.0),
            stop_lon: Some(2.0),
        }
    }

    fn trip(id: &str, short_name: &str, service_id: &str) -> TripRecord {
        TripRecord {
            trip_id: Some(id.to_string()),
            route_id: Some("R1".to_string()),
            trip_short_name: Some(short_name.to_string()),
            trip_headsign: None,
            service_id: Some(service_id.to_string()),
        }
    }

    fn st(stop_id: &str, seq: u32, time: &str) -> StopTimeRecord {
        StopTimeRecord {
            stop_id: Some(stop_id.to_string()),
            arrival_time: Some(time.to_string()),
            departure_time: Some(time.to_string()),
            stop_sequence: Some(seq),
        }
    }

    fn base_snapshot() -> FeedSnapshot {
        FeedSnapshot {
            routes: vec![route("R1", "Cardinal")],
            stops: vec![stop("A", "Union Station"), stop("B", "Central Station")],
            ..Default::default()
        }
    }

    #[test]
    fn empty_snapshot_is_not_loaded() {
        let (store, report) = RecordStore::build(FeedSnapshot::default());
        assert!(!store.is_loaded());
        assert!(!report.loaded);
        assert!(report.is_clean());
    }

    #[test]
    fn routes_without_stops_is_not_loaded() {
        let snapshot = FeedSnapshot {
            routes: vec![route("R1", "Cardinal")],
            ..Default::default()
        };
        let (_, report) = RecordStore::build(snapshot);
        assert!(!report.loaded);
    }

    #[test]
    fn routes_and_stops_is_loaded() {
        let (store, report) = RecordStore::build(base_snapshot());
        assert!(store.is_loaded());
        assert!(report.loaded);
        assert_eq!(report.routes.loaded, 1);
        assert_eq!(report.stops.loaded, 2);
    }

    #[test]
    fn rows_with_missing_keys_are_skipped() {
        let mut snapshot = base_snapshot();
        snapshot.routes.push(RouteRecord::default());
        snapshot.stops.push(StopRecord {
            stop_id: Some("   ".to_string()),
            ..Default::default()
        });
        snapshot.trips.push(TripRecord::default());
        snapshot.trips.push(trip("T1", "51", "S1"));

        let (store, report) = RecordStore::build(snapshot);

        assert_eq!(report.routes, crate::store::RowCounts { loaded: 1, skipped: 1 });
        assert_eq!(report.stops.skipped, 1);
        assert_eq!(report.trips.skipped, 1);
        assert_eq!(store.trips().len(), 1);
        assert!(store.stop("   ").is_none());
    }

    #[test]
    fn short_name_index_groups_trips() {
        let mut snapshot = base_snapshot();
        snapshot.trips = vec![
            trip("T1", "51", "WKDY"),
            trip("T2", "51", "WKND"),
            trip("T3", "50", "WKDY"),
            trip("T4", "", "WKDY"),
        ];

        let (store, _) = RecordStore::build(snapshot);

        assert_eq!(store.trips_by_short_name("51"), ["T1", "T2"]);
        assert_eq!(store.trips_by_short_name("50"), ["T3"]);
        assert!(store.trips_by_short_name("").is_empty());
        assert!(store.trips_by_short_name("99").is_empty());
    }

    #[test]
    fn duplicate_trip_id_replaces_without_stale_index() {
        let mut snapshot = base_snapshot();
        snapshot.trips = vec![trip("T1", "51", "S1"), trip("T1", "52", "S1")];

        let (store, _) = RecordStore::build(snapshot);

        assert_eq!(store.trips().len(), 1);
        assert_eq!(store.trip("T1").unwrap().short_name, "52");
        assert!(store.trips_by_short_name("51").is_empty());
        assert_eq!(store.trips_by_short_name("52"), ["T1"]);
    }

    #[test]
    fn stop_times_sorted_and_deduplicated() {
        let mut snapshot = base_snapshot();
        snapshot.stop_times.push((
            "T1".to_string(),
            vec![
                st("B", 3, "09:30:00"),
                st("A", 1, "08:00:00"),
                st("X", 1, "08:05:00"),
                StopTimeRecord::default(),
            ],
        ));

        let (store, report) = RecordStore::build(snapshot);

        let seqs: Vec<_> = store.stop_times("T1").iter().map(|s| s.sequence).collect();
        assert_eq!(seqs, vec![1, 3]);
        assert_eq!(store.stop_times("T1")[0].stop_id, "A");
        assert_eq!(report.stop_times.loaded, 2);
        assert_eq!(report.stop_times.skipped, 2);
    }

    #[test]
    fn stop_times_under_blank_trip_id_skipped() {
        let mut snapshot = base_snapshot();
        snapshot
            .stop_times
            .push((String::new(), vec![st("A", 1, "08:00:00")]));

        let (store, report) = RecordStore::build(snapshot);

        assert!(store.stop_time_groups().is_empty());
        assert_eq!(report.stop_times.skipped, 1);
    }

    #[test]
    fn post_midnight_times_kept_verbatim() {
        let mut snapshot = base_snapshot();
        snapshot
            .stop_times
            .push(("T1".to_string(), vec![st("A", 1, "25:15:00")]));

        let (store, _) = RecordStore::build(snapshot);

        assert_eq!(store.stop_times("T1")[0].departure.as_str(), "25:15:00");
    }

    #[test]
    fn calendar_data_flag() {
        let (store, report) = RecordStore::build(base_snapshot());
        assert!(!store.has_calendar_data());
        assert!(!report.has_calendar_data);

        let mut snapshot = base_snapshot();
        snapshot.calendar_dates.push(CalendarDateRecord {
            service_id: Some("S1".to_string()),
            date: Some("20240704".to_string()),
            exception_type: Some(2),
        });
        let (store, report) = RecordStore::build(snapshot);
        assert!(store.has_calendar_data());
        assert!(report.has_calendar_data);
        assert_eq!(
            store.exception("S1", ServiceDate::parse("20240704").unwrap()),
            Some(ExceptionType::Removed)
        );
    }

    #[test]
    fn invalid_calendar_rows_do_not_count_as_calendar_data() {
        let mut snapshot = base_snapshot();
        snapshot.calendar.push(CalendarRecord {
            service_id: Some("S1".to_string()),
            start_date: Some("not a date".to_string()),
            end_date: Some("20241231".to_string()),
            ..Default::default()
        });
        snapshot.calendar_dates.push(CalendarDateRecord {
            service_id: Some("S1".to_string()),
            date: Some("20240704".to_string()),
            exception_type: Some(9),
        });

        let (store, report) = RecordStore::build(snapshot);

        assert!(!store.has_calendar_data());
        assert_eq!(report.calendar.skipped, 1);
        assert_eq!(report.calendar_dates.skipped, 1);
        assert!(store.calendar_entry("S1").is_none());
    }

    #[test]
    fn shapes_pass_through_in_order() {
        let mut snapshot = base_snapshot();
        snapshot.shapes.push((
            "SH1".to_string(),
            vec![
                ShapePointRecord {
                    shape_pt_lat: Some(1.0),
                    shape_pt_lon: Some(2.0),
                },
                ShapePointRecord::default(),
                ShapePointRecord {
                    shape_pt_lat: Some(3.0),
                    shape_pt_lon: Some(4.0),
                },
            ],
        ));

        let (store, report) = RecordStore::build(snapshot);

        let shape = store.shape("SH1").unwrap();
        assert_eq!(shape, [ShapePoint { lat: 1.0, lon: 2.0 }, ShapePoint { lat: 3.0, lon: 4.0 }]);
        assert_eq!(report.shape_points.skipped, 1);
        assert!(store.shape("SH2").is_none());
    }

    #[test]
    fn grouped_tables_keep_feed_order() {
        let mut snapshot = base_snapshot();
        snapshot
            .stop_times
            .push(("T9".to_string(), vec![st("A", 1, "08:00:00")]));
        snapshot
            .stop_times
            .push(("T1".to_string(), vec![st("A", 1, "09:00:00")]));
        let point = ShapePointRecord {
            shape_pt_lat: Some(1.0),
            shape_pt_lon: Some(2.0),
        };
        snapshot.shapes.push(("SH2".to_string(), vec![point.clone()]));
        snapshot.shapes.push(("SH1".to_string(), vec![point]));

        let (store, _) = RecordStore::build(snapshot);

        let trips: Vec<_> = store.stop_time_groups().ids().collect();
        assert_eq!(trips, vec!["T9", "T1"]);
        let shapes: Vec<_> = store.shape_ids().collect();
        assert_eq!(shapes, vec!["SH2", "SH1"]);
    }

    #[test]
    fn mistyped_rows_are_counted_not_fatal() {
        let json = r#"{
            "routes": [{"route_id": "R1", "route_long_name": "Cardinal"}],
            "stops": [{"stop_id": "A", "stop_name": "Union Station"}],
            "stop_times": {
                "T1": [
                    {"stop_id": "A", "stop_sequence": "1", "departure_time": "08:00:00"},
                    {"stop_id": "B", "stop_sequence": "second"}
                ]
            },
            "calendar_dates": [
                {"service_id": "S1", "date": "20240704", "exception_type": "2"},
                {"service_id": "S1", "date": "20240705", "exception_type": "removed"}
            ]
        }"#;
        let snapshot = FeedSnapshot::from_json(json).unwrap();

        let (store, report) = RecordStore::build(snapshot);

        assert!(report.loaded);
        assert_eq!(store.stop_times("T1").len(), 1);
        assert_eq!(report.stop_times, crate::store::RowCounts { loaded: 1, skipped: 1 });
        assert_eq!(report.calendar_dates, crate::store::RowCounts { loaded: 1, skipped: 1 });
        assert_eq!(
            store.exception("S1", ServiceDate::parse("20240704").unwrap()),
            Some(ExceptionType::Removed)
        );
    }
}
