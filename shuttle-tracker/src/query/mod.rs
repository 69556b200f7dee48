//! Read-only schedule queries.
//!
//! `TimetableIndex` precomputes the lookup maps once; the
//! `ScheduleQueryEngine` answers ad hoc queries over the immutable
//! timetable. All query operations are total: not-found conditions are
//! logged and produce an empty result, never an error.

mod engine;
mod index;

pub use engine::{Connection, Departure, LineSummary, ScheduleQueryEngine, ServiceStop};
pub use index::{REQUEST_STOP_PHRASE, TimetableIndex};
