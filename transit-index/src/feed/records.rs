//! Decoded feed rows.
//!
//! These types map directly to the columns of a static GTFS feed. They use
//! `Option` liberally because upstream decoders omit fields rather than
//! sending empty values in many cases; validation happens when the store
//! is built, not here.
//!
//! Feeds converted from CSV often carry numbers as strings and ids as
//! numbers. Every column is decoded leniently: a value of the wrong JSON
//! type is converted when it can be and becomes `None` when it cannot, so
//! the row is skipped at load instead of failing the whole snapshot.

use std::str::FromStr;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// A row of `routes.txt`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteRecord {
    #[serde(default, deserialize_with = "loose_text")]
    pub route_id: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub route_long_name: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub route_short_name: Option<String>,
}

/// A row of `stops.txt`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopRecord {
    #[serde(default, deserialize_with = "loose_text")]
    pub stop_id: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub stop_name: Option<String>,
    #[serde(default, deserialize_with = "loose_number")]
    pub stop_lat: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub stop_lon: Option<f64>,
}

/// A row of `trips.txt`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripRecord {
    #[serde(default, deserialize_with = "loose_text")]
    pub trip_id: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub route_id: Option<String>,
    /// Public train number.
    #[serde(default, deserialize_with = "loose_text")]
    pub trip_short_name: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub trip_headsign: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub service_id: Option<String>,
}

/// A row of `stop_times.txt`, already grouped under its trip id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopTimeRecord {
    #[serde(default, deserialize_with = "loose_text")]
    pub stop_id: Option<String>,
    /// "HH:MM:SS"; hours may exceed 23.
    #[serde(default, deserialize_with = "loose_text")]
    pub arrival_time: Option<String>,
    /// "HH:MM:SS"; hours may exceed 23.
    #[serde(default, deserialize_with = "loose_text")]
    pub departure_time: Option<String>,
    #[serde(default, deserialize_with = "loose_number")]
    pub stop_sequence: Option<u32>,
}

/// A row of `shapes.txt`, already grouped under its shape id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShapePointRecord {
    #[serde(default, deserialize_with = "loose_number")]
    pub shape_pt_lat: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub shape_pt_lon: Option<f64>,
}

/// A row of `calendar.txt`.
///
/// Weekday columns accept booleans or the feed's `0`/`1` encoding.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarRecord {
    #[serde(default, deserialize_with = "loose_text")]
    pub service_id: Option<String>,
    #[serde(default, deserialize_with = "day_flag")]
    pub monday: bool,
    #[serde(default, deserialize_with = "day_flag")]
    pub tuesday: bool,
    #[serde(default, deserialize_with = "day_flag")]
    pub wednesday: bool,
    #[serde(default, deserialize_with = "day_flag")]
    pub thursday: bool,
    #[serde(default, deserialize_with = "day_flag")]
    pub friday: bool,
    #[serde(default, deserialize_with = "day_flag")]
    pub saturday: bool,
    #[serde(default, deserialize_with = "day_flag")]
    pub sunday: bool,
    /// `YYYYMMDD`
    #[serde(default, deserialize_with = "loose_text")]
    pub start_date: Option<String>,
    /// `YYYYMMDD`
    #[serde(default, deserialize_with = "loose_text")]
    pub end_date: Option<String>,
}

impl CalendarRecord {
    /// Weekday flags ordered Sunday first.
    pub fn days_sunday_first(&self) -> [bool; 7] {
        [
            self.sunday,
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
            self.saturday,
        ]
    }
}

/// A row of `calendar_dates.txt`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarDateRecord {
    #[serde(default, deserialize_with = "loose_text")]
    pub service_id: Option<String>,
    /// `YYYYMMDD`
    #[serde(default, deserialize_with = "loose_text")]
    pub date: Option<String>,
    /// 1 = added, 2 = removed.
    #[serde(default, deserialize_with = "loose_number")]
    pub exception_type: Option<u8>,
}

/// Deserialize a text column, accepting numbers and booleans as text.
fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
        Other(IgnoredAny),
    }

    Ok(match Option::<Text>::deserialize(deserializer)? {
        Some(Text::Text(s)) => Some(s),
        Some(Text::Int(n)) => Some(n.to_string()),
        Some(Text::Float(x)) => Some(x.to_string()),
        Some(Text::Bool(b)) => Some(b.to_string()),
        Some(Text::Other(_)) | None => None,
    })
}

/// Deserialize a numeric column from a number or numeric text.
///
/// Anything else, including numbers out of range for `T`, becomes `None`.
fn loose_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number<T> {
        Number(T),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<Number<T>>::deserialize(deserializer)? {
        Some(Number::Number(n)) => Some(n),
        Some(Number::Text(s)) => s.trim().parse().ok(),
        Some(Number::Other(_)) | None => None,
    })
}

/// Deserialize a weekday flag from `true`/`false`, `0`/`1`, or `"0"`/`"1"`.
fn day_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(u64),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(n)) => n != 0,
        Some(Flag::Text(s)) => matches!(s.trim(), "1" | "true"),
        Some(Flag::Other(_)) | None => false,
    })
}
