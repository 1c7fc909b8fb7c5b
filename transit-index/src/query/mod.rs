//! Queries over a loaded record store.
//!
//! `trips` answers schedule questions (which trips call where, and in what
//! order); `search` resolves free text to stations, routes, and trains.

mod config;
mod search;
mod trips;


pub use config::QueryConfig;
pub use search::{ResultKind, SearchResult, SearchTarget, search, search_stations};
pub use trips::{
    StopVisit, TripConnection, intermediate_stops, stop_times_for_trip, trips_at_stop,
    trips_connecting,
};
