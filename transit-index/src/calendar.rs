//! Service calendar resolution.
//!
//! Decides whether a service runs on a given date: per-date exceptions
//! first, then the weekly pattern within its date bounds.

use chrono::NaiveDate;

use crate::domain::{ExceptionType, ServiceDate};
use crate::store::RecordStore;

/// Returns whether `service_id` operates on `date`.
///
/// Feeds without any calendar data treat every service as always running,
/// as does an empty service id. Otherwise an exception for the exact date
/// wins; failing that the service needs a calendar entry whose bounds cover
/// the date and whose weekly pattern includes its weekday.
pub fn is_service_active(store: &RecordStore, service_id: &str, date: NaiveDate) -> bool {
    if !store.has_calendar_data() || service_id.is_empty() {
        return true;
    }

    let day = ServiceDate::from(date);

    match store.exception(service_id, day) {
        Some(ExceptionType::Added) => return true,
        Some(ExceptionType::Removed) => return false,
        None => {}
    }

    match store.calendar_entry(service_id) {
        Some(entry) => entry.covers(day) && entry.days.runs_on(date),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{CalendarDateRecord, CalendarRecord, FeedSnapshot, RouteRecord, StopRecord};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Weekday service for 2024, Monday flag controlled by the caller.
    fn weekday_calendar(service_id: &str, monday: bool) -> CalendarRecord {
        CalendarRecord {
            service_id: Some(service_id.to_string()),
            monday,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: false,
            sunday: false,
            start_date: Some("20240101".to_string()),
            end_date: Some("20241231".to_string()),
        }
    }

    fn exception(service_id: &str, day: &str, code: u8) -> CalendarDateRecord {
        CalendarDateRecord {
            service_id: Some(service_id.to_string()),
            date: Some(day.to_string()),
            exception_type: Some(code),
        }
    }

    fn store(
        calendar: Vec<CalendarRecord>,
        calendar_dates: Vec<CalendarDateRecord>,
    ) -> RecordStore {
        let snapshot = FeedSnapshot {
            routes: vec![RouteRecord {
                route_id: Some("R1".to_string()),
                ..Default::default()
            }],
            stops: vec![StopRecord {
                stop_id: Some("A".to_string()),
                ..Default::default()
            }],
            calendar,
            calendar_dates,
            ..Default::default()
        };
        RecordStore::build(snapshot).0
    }

    #[test]
    fn no_calendar_data_means_always_active() {
        let store = store(vec![], vec![]);
        assert!(is_service_active(&store, "S1", date(2024, 3, 11)));
        assert!(is_service_active(&store, "", date(1999, 1, 1)));
        assert!(is_service_active(&store, "anything", date(2030, 6, 30)));
    }

    #[test]
    fn empty_service_id_is_active() {
        let store = store(vec![weekday_calendar("S1", true)], vec![]);
        assert!(is_service_active(&store, "", date(2024, 3, 9)));
    }

    #[test]
    fn weekly_pattern() {
        let store = store(vec![weekday_calendar("S1", true)], vec![]);
        // 2024-03-11 Monday, 2024-03-09 Saturday, 2024-03-10 Sunday
        assert!(is_service_active(&store, "S1", date(2024, 3, 11)));
        assert!(!is_service_active(&store, "S1", date(2024, 3, 9)));
        assert!(!is_service_active(&store, "S1", date(2024, 3, 10)));
    }

    #[test]
    fn outside_bounds_is_inactive() {
        let store = store(vec![weekday_calendar("S1", true)], vec![]);
        // Mondays just outside the range
        assert!(!is_service_active(&store, "S1", date(2023, 12, 25)));
        assert!(!is_service_active(&store, "S1", date(2025, 1, 6)));
        // Bounds are inclusive: 2024-01-01 is a Monday, 2024-12-31 a Tuesday
        assert!(is_service_active(&store, "S1", date(2024, 1, 1)));
        assert!(is_service_active(&store, "S1", date(2024, 12, 31)));
    }

    #[test]
    fn unknown_service_is_inactive() {
        let store = store(vec![weekday_calendar("S1", true)], vec![]);
        assert!(!is_service_active(&store, "S2", date(2024, 3, 11)));
    }

    #[test]
    fn added_exception_overrides_inactive_weekday() {
        let store = store(
            vec![weekday_calendar("S1", false)],
            vec![exception("S1", "20240311", 1)],
        );
        assert!(is_service_active(&store, "S1", date(2024, 3, 11)));
        // Other Mondays stay inactive
        assert!(!is_service_active(&store, "S1", date(2024, 3, 18)));
    }

    #[test]
    fn removed_exception_overrides_active_weekday() {
        let store = store(
            vec![weekday_calendar("S1", true)],
            vec![exception("S1", "20240311", 2)],
        );
        assert!(!is_service_active(&store, "S1", date(2024, 3, 11)));
        assert!(is_service_active(&store, "S1", date(2024, 3, 18)));
    }

    #[test]
    fn added_exception_without_calendar_entry() {
        let store = store(vec![], vec![exception("XMAS", "20241225", 1)]);
        assert!(is_service_active(&store, "XMAS", date(2024, 12, 25)));
        assert!(!is_service_active(&store, "XMAS", date(2024, 12, 26)));
    }

    #[test]
    fn added_exception_outside_bounds() {
        let store = store(
            vec![weekday_calendar("S1", true)],
            vec![exception("S1", "20250704", 1)],
        );
        assert!(is_service_active(&store, "S1", date(2025, 7, 4)));
    }
}
