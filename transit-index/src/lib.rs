//! Transit schedule index.
//!
//! Loads a whole-feed snapshot of GTFS-like schedule data into memory and
//! answers questions about it: which services run on a date, which trips
//! call at a stop, which trips connect two stops, and free-text search over
//! stations, routes, and trains.

pub mod calendar;
pub mod domain;
pub mod feed;
pub mod index;
pub mod query;
pub mod store;

#[cfg(test)]
mod testing;

pub use index::{IndexError, TransitIndex};
