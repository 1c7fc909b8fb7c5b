//! Domain types for the transit index.
//!
//! This module contains the validated value types and feed entities held by
//! the record store. Value types enforce their invariants at construction
//! time, so code that receives them can trust their validity.

mod date;
mod error;
mod model;
mod time;
mod train_number;

pub use date::{InvalidDate, ServiceDate, WeekdayMask};
pub use error::DomainError;
pub use model::{CalendarEntry, ExceptionType, Route, ShapePoint, Stop, StopTime, Trip};
pub use time::{FeedTime, TimeError};
pub use train_number::TrainNumber;
