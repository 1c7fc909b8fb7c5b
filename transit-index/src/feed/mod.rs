//! Decoded feed snapshots.
//!
//! A `FeedSnapshot` is everything a load transaction needs, supplied
//! wholesale by whatever fetched and decoded the feed. Calendar and shape
//! tables default to empty so older feeds without them still load.

mod error;
mod records;

use std::fmt;
use std::io::Read;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

pub use error::FeedError;
pub use records::{
    CalendarDateRecord, CalendarRecord, RouteRecord, ShapePointRecord, StopRecord,
    StopTimeRecord, TripRecord,
};

/// Rows grouped under an id, in the order the feed lists the groups.
pub type Grouped<T> = Vec<(String, Vec<T>)>;

/// A complete decoded feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedSnapshot {
    #[serde(default)]
    pub routes: Vec<RouteRecord>,

    #[serde(default)]
    pub stops: Vec<StopRecord>,

    /// Stop-time rows grouped by trip id.
    #[serde(default, deserialize_with = "in_feed_order")]
    pub stop_times: Grouped<StopTimeRecord>,

    /// Shape points grouped by shape id, in drawing order.
    #[serde(default, deserialize_with = "in_feed_order")]
    pub shapes: Grouped<ShapePointRecord>,

    #[serde(default)]
    pub trips: Vec<TripRecord>,

    #[serde(default)]
    pub calendar: Vec<CalendarRecord>,

    #[serde(default)]
    pub calendar_dates: Vec<CalendarDateRecord>,
}

impl FeedSnapshot {
    /// Decode a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, FeedError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode a snapshot from a JSON reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, FeedError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read and decode a JSON snapshot file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }
}

/// Deserialize a JSON object of `id -> [rows]`, keeping key order.
fn in_feed_order<'de, D, T>(deserializer: D) -> Result<Grouped<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct GroupsVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for GroupsVisitor<T> {
        type Value = Grouped<T>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object of rows keyed by id")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut groups = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, Vec<T>>()? {
                groups.push(entry);
            }
            Ok(groups)
        }
    }

    deserializer.deserialize_map(GroupsVisitor(PhantomData))
}
