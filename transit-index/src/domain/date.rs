//! Service calendar dates and weekly patterns.

use std::fmt;

use chrono::{Datelike, NaiveDate};

/// Error returned when parsing an invalid calendar date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date: {reason}")]
pub struct InvalidDate {
    reason: &'static str,
}

impl InvalidDate {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A calendar date packed as `YYYY * 10000 + MM * 100 + DD`.
///
/// Packing keeps range checks against calendar bounds to a single integer
/// comparison. Any `ServiceDate` is a real calendar date by construction.
///
/// # Examples
///
/// ```
/// use transit_index::domain::ServiceDate;
///
/// let d = ServiceDate::parse("20240315").unwrap();
/// assert_eq!(d.as_u32(), 20240315);
///
/// // ISO form is accepted too
/// assert_eq!(ServiceDate::parse("2024-03-15").unwrap(), d);
///
/// // Not a real date
/// assert!(ServiceDate::parse("20240230").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceDate(u32);

impl ServiceDate {
    /// Parse a date in `YYYYMMDD` or `YYYY-MM-DD` form.
    pub fn parse(s: &str) -> Result<Self, InvalidDate> {
        let s = s.trim();
        let format = match s.len() {
            8 => "%Y%m%d",
            10 => "%Y-%m-%d",
            _ => return Err(InvalidDate::new("expected YYYYMMDD or YYYY-MM-DD")),
        };
        let date = NaiveDate::parse_from_str(s, format)
            .map_err(|_| InvalidDate::new("not a calendar date"))?;
        Ok(Self::from(date))
    }

    /// Returns the packed integer form.
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Converts back to a chrono date.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            (self.0 / 10_000) as i32,
            (self.0 / 100) % 100,
            self.0 % 100,
        )
    }
}

impl From<NaiveDate> for ServiceDate {
    fn from(date: NaiveDate) -> Self {
        let year = date.year().max(0) as u32;
        Self(year * 10_000 + date.month() * 100 + date.day())
    }
}

impl fmt::Debug for ServiceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceDate({})", self.0)
    }
}

impl fmt::Display for ServiceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08}", self.0)
    }
}

/// Which days of the week a service runs, indexed Sunday = 0 through
/// Saturday = 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeekdayMask([bool; 7]);

impl WeekdayMask {
    /// Build a mask from flags ordered Sunday first.
    pub fn from_sunday_first(days: [bool; 7]) -> Self {
        Self(days)
    }

    /// Returns the flag for a weekday index (Sunday = 0).
    pub fn runs_on_index(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    /// Returns whether the mask includes the weekday of `date`.
    pub fn runs_on(&self, date: NaiveDate) -> bool {
        self.runs_on_index(date.weekday().num_days_from_sunday() as usize)
    }

    /// Returns true if no day is set.
    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|&d| d)
    }
}
