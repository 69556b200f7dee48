//! Domain types for the shuttle timetable.
//!
//! This module contains the core domain model types that represent a
//! validated timetable. All invariants (unique ids and names, schedule
//! shape, time ordering) are enforced at the dataset boundary, so code
//! that receives these types can trust their validity.

mod geo;
mod ids;
mod time;
mod timetable;

pub use geo::{Coordinates, EARTH_RADIUS_METERS, distance_meters};
pub use ids::{NoteId, ServiceId, StopId};
pub use time::{DayTime, TimeError};
pub use timetable::{Carrier, CarrierContact, Line, Note, Service, Stop, StopEvent, Timetable};
