//! Feed entity types.
//!
//! These are the validated, immutable records held by the record store.
//! Each one is created only by a load transaction and never mutated
//! afterwards.

use serde::Serialize;

use super::{FeedTime, ServiceDate, WeekdayMask};

/// A route (a named line of service).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub id: String,
    /// Long display name, e.g. "Cardinal".
    pub long_name: String,
    pub short_name: Option<String>,
}

impl Route {
    /// Best display name: long name, else short name, else the id.
    pub fn display_name(&self) -> &str {
        if !self.long_name.is_empty() {
            &self.long_name
        } else {
            self.short_name
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or(&self.id)
        }
    }
}

/// A stop or station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// One scheduled run of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    pub id: String,
    pub route_id: String,
    /// Public train number. Not unique: the same run on different calendar
    /// patterns is published as several trips sharing one short name.
    pub short_name: String,
    pub headsign: String,
    pub service_id: String,
}

/// One scheduled visit of a trip to a stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopTime {
    pub stop_id: String,
    pub arrival: FeedTime,
    pub departure: FeedTime,
    pub sequence: u32,
}

/// Weekly recurrence of a service between two inclusive dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEntry {
    pub service_id: String,
    pub start_date: ServiceDate,
    pub end_date: ServiceDate,
    pub days: WeekdayMask,
}

impl CalendarEntry {
    /// Returns true if `date` lies within the inclusive date bounds.
    pub fn covers(&self, date: ServiceDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Per-date override of a service's weekly pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExceptionType {
    /// Service runs on this date regardless of the weekly pattern.
    Added,
    /// Service does not run on this date regardless of the weekly pattern.
    Removed,
}

impl TryFrom<u8> for ExceptionType {
    type Error = super::DomainError;

    /// Feed codes: 1 = added, 2 = removed.
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(ExceptionType::Added),
            2 => Ok(ExceptionType::Removed),
            other => Err(super::DomainError::InvalidExceptionType(other)),
        }
    }
}

/// A single point of a shape polyline, passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapePoint {
    pub lat: f64,
    pub lon: f64,
}
