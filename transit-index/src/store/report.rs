//! Load transaction outcome.

use serde::Serialize;

/// How many rows of one feed table were kept and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowCounts {
    pub loaded: usize,
    pub skipped: usize,
}

impl RowCounts {
    pub(crate) fn keep(&mut self) {
        self.loaded += 1;
    }

    pub(crate) fn skip(&mut self) {
        self.skipped += 1;
    }
}

/// Summary of one load transaction.
///
/// Malformed rows never fail a load; they are dropped and counted here so
/// callers can still see data-quality problems in the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub routes: RowCounts,
    pub stops: RowCounts,
    pub trips: RowCounts,
    pub stop_times: RowCounts,
    pub calendar: RowCounts,
    pub calendar_dates: RowCounts,
    pub shape_points: RowCounts,

    /// Both routes and stops are non-empty.
    pub loaded: bool,

    /// At least one calendar entry or exception was ingested.
    pub has_calendar_data: bool,
}

impl LoadReport {
    /// Total rows dropped across every table.
    pub fn total_skipped(&self) -> usize {
        [
            self.routes,
            self.stops,
            self.trips,
            self.stop_times,
            self.calendar,
            self.calendar_dates,
            self.shape_points,
        ]
        .iter()
        .map(|c| c.skipped)
        .sum()
    }

    /// Returns true if every row made it into the store.
    pub fn is_clean(&self) -> bool {
        self.total_skipped() == 0
    }
}
